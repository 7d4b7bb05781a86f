//! Serial side of the controller: writes instructions, reports diagnostics

use hmilink_hal::UartTx;
use hmilink_protocol::TERMINATOR;

use crate::diagnostics::{Diagnostic, DiagnosticSink, TransferDirection};
use crate::traits::Outbound;

/// Transport and diagnostic sink bundled as an [`Outbound`]
pub struct Link<T, D> {
    transport: T,
    diagnostics: D,
}

impl<T: UartTx, D: DiagnosticSink> Link<T, D> {
    pub fn new(transport: T, diagnostics: D) -> Self {
        Self {
            transport,
            diagnostics,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    pub fn into_parts(self) -> (T, D) {
        (self.transport, self.diagnostics)
    }

    fn write_frame(&mut self, instruction: &[u8]) -> Result<(), T::Error> {
        self.transport.write_blocking(instruction)?;
        self.transport.write_blocking(&TERMINATOR)
    }
}

impl<T: UartTx, D: DiagnosticSink> Outbound for Link<T, D> {
    fn send(&mut self, instruction: &[u8]) {
        match self.write_frame(instruction) {
            Ok(()) => trace!("sent {} byte instruction", instruction.len()),
            Err(_) => {
                warn!("failed to write instruction to display");
                self.diagnostics.record(Diagnostic::TransportError {
                    direction: TransferDirection::Write,
                });
            }
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.record(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingSink;
    use hmilink_hal::MockSerial;

    #[test]
    fn test_send_appends_terminator() {
        let mut link = Link::new(MockSerial::new(), RecordingSink::default());
        link.send(b"page 2");

        assert_eq!(link.transport().tx(), b"page 2\xFF\xFF\xFF");
        assert!(link.diagnostics().seen.is_empty());
    }

    #[test]
    fn test_write_failure_reported_not_returned() {
        let mut link = Link::new(MockSerial::new(), RecordingSink::default());
        link.transport_mut().fail_writes(true);
        link.send(b"sendme");

        let (serial, sink) = link.into_parts();
        assert!(serial.tx().is_empty());
        assert_eq!(
            sink.seen,
            vec![Diagnostic::TransportError {
                direction: TransferDirection::Write
            }]
        );
    }

    #[test]
    fn test_record_forwards_to_sink() {
        let mut link = Link::new(MockSerial::new(), RecordingSink::default());
        link.record(Diagnostic::ResyncRequested);
        assert_eq!(link.diagnostics_mut().seen, vec![Diagnostic::ResyncRequested]);
    }
}
