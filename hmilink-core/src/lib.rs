//! Display-link controller for serial HMI touch panels
//!
//! This crate contains everything between the serial port and the
//! application's pages:
//!
//! - Page capability trait and the handle pages send commands through
//! - Page registry and lifecycle (enter/leave, one-time init, resync)
//! - Periodic refresh scheduling
//! - The polled [`DisplayController`] tying framer, decoder and pages together
//! - Link configuration and diagnostics
//!
//! The controller is cooperative: call [`DisplayController::poll`] from one
//! execution context with a free-running millisecond counter. It never
//! blocks and never spawns work of its own.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod lifecycle;
pub mod link;
pub mod scheduler;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, LinkConfig};
pub use controller::{DisplayController, LinkStats};
pub use diagnostics::{Diagnostic, DiagnosticSink, NoDiagnostics, TransferDirection};
pub use lifecycle::{PageLifecycle, PageRegistry, PageState, RegistryError, MAX_PAGES};
pub use link::Link;
pub use scheduler::RefreshScheduler;
pub use traits::{Outbound, Page, PageId, PageLink};
