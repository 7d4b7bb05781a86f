//! hmilink Hardware Abstraction Layer
//!
//! This crate defines the serial transport traits the display-link
//! controller is written against. Chip-specific UART drivers (or a host
//! serial port) implement them; the controller never touches a peripheral
//! directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hmilink-core (DisplayController)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hmilink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ board UART    │       │  MockSerial   │
//! │ driver        │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`uart::Uart`] - Both halves on one peripheral

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod uart;

pub use uart::{Uart, UartRx, UartTx};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockError, MockSerial};
