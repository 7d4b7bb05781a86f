//! Seams between the controller and the application
//!
//! [`Page`] is implemented by application code, [`Outbound`] by whatever
//! carries instructions to the display.

pub mod outbound;
pub mod page;

pub use outbound::Outbound;
pub use page::{Page, PageId, PageLink};
