//! Page lifecycle
//!
//! Tracks which page is active, runs enter/leave and one-time init hooks
//! on transitions, and resynchronizes when events show the display is on
//! a different page than believed.

pub mod manager;
pub mod registry;

pub use manager::PageLifecycle;
pub use registry::{PageRegistry, PageState, RegistryError, MAX_PAGES};
