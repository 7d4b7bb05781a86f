//! Outbound side of the display link

use crate::diagnostics::Diagnostic;

/// Destination for instructions and diagnostics
///
/// Delivery is fire-and-forget: a failed write is reported as a
/// diagnostic, never returned to the caller.
pub trait Outbound {
    /// Write `instruction` followed by the three-byte terminator
    fn send(&mut self, instruction: &[u8]);

    /// Report a diagnostic
    fn record(&mut self, diagnostic: Diagnostic);
}

impl<O: Outbound + ?Sized> Outbound for &mut O {
    fn send(&mut self, instruction: &[u8]) {
        (**self).send(instruction)
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        (**self).record(diagnostic)
    }
}
