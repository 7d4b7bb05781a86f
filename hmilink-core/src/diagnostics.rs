//! Structured diagnostics
//!
//! Everything the link drops, recovers from, or decides on its own is
//! reported to a [`DiagnosticSink`] handed to the controller at
//! construction. The sink sees the same records in every build; text
//! logging through `defmt`/`log` is independent of it.

use crate::traits::PageId;

/// Which half of the transport failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferDirection {
    Read,
    Write,
}

/// Something worth knowing about the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// A frame outgrew the receive buffer and was discarded
    FrameOverflow { discarded: usize },
    /// A partial frame went stale and was discarded
    FrameTimeout { discarded: usize },
    /// A frame was too short for its type
    FrameDropped { msg_type: u8, len: usize },
    /// A frame had a type byte nobody handles
    UnknownMessage { msg_type: u8 },
    /// The active page changed
    PageSwitched { from: PageId, to: PageId },
    /// A switch was requested to an id that is not registered
    UnknownPage { page_id: PageId },
    /// A touch named a page other than the one believed active
    TouchResync { reported: PageId, believed: PageId },
    /// A touch could not be delivered after resynchronizing
    TouchDropped { page_id: PageId, component_id: u8 },
    /// The display was asked to report its current page
    ResyncRequested,
    /// An inactive page tried to send a command
    CommandSuppressed { page_id: PageId },
    /// The transport reported an error
    TransportError { direction: TransferDirection },
}

/// Receiver for [`Diagnostic`] records
pub trait DiagnosticSink {
    fn record(&mut self, diagnostic: Diagnostic);
}

/// Sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {
    fn record(&mut self, _diagnostic: Diagnostic) {}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, diagnostic: Diagnostic) {
        (**self).record(diagnostic)
    }
}
