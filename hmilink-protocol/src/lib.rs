//! HMI Display Wire Protocol
//!
//! This crate implements the serial protocol spoken by resistive/capacitive
//! touch HMI panels: messages are not length-prefixed, they are terminated
//! by three consecutive boundary bytes.
//!
//! # Protocol Overview
//!
//! Display → host:
//! ```text
//! ┌──────┬─────────────┬──────┬──────┬──────┐
//! │ TYPE │ PAYLOAD     │ 0xFF │ 0xFF │ 0xFF │
//! │ 1B   │ 0–N B       │      │      │      │
//! └──────┴─────────────┴──────┴──────┴──────┘
//! ```
//!
//! Host → display: an ASCII instruction (`page 2`, `t0.txt="Hi"`,
//! `sendme`) followed by the same three boundary bytes.
//!
//! [`FrameAssembler`] turns the byte stream into [`Frame`]s and
//! [`DisplayEvent::from_frame`] classifies them.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod events;
pub mod frame;
pub mod messages;

pub use events::{CommandError, TextPayload, TouchAction, TouchCoordinate};
pub use frame::{
    Frame, FrameAssembler, FramerEvent, FramerState, BOUNDARY_BYTE, DEFAULT_FRAME_TIMEOUT_MS,
    DEFAULT_RX_CAPACITY, TERMINATOR,
};
pub use messages::{DisplayEvent, HostCommand, MessageTooLong, MAX_COMMAND_LEN};
