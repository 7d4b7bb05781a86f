//! Periodic refresh scheduling
//!
//! Time is a free-running `u32` millisecond counter supplied by the caller;
//! every comparison uses wrapping arithmetic so the schedule survives the
//! counter rolling over.

pub mod refresh;

pub use refresh::{RefreshScheduler, DEFAULT_REFRESH_INTERVAL_MS};
