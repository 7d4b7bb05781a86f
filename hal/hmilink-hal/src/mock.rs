//! In-memory serial transport for host-side tests

use heapless::{Deque, Vec};

use crate::uart::{UartRx, UartTx};

/// Receive queue capacity of the mock
pub const MOCK_RX_CAPACITY: usize = 1024;

/// Transmit log capacity of the mock
pub const MOCK_TX_CAPACITY: usize = 1024;

/// Errors injected by [`MockSerial`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// A read failure was requested with [`MockSerial::fail_next_read`]
    Read,
    /// Writes were disabled with [`MockSerial::fail_writes`]
    Write,
    /// A queue or log ran out of space
    Full,
}

/// Loopback-free fake UART
///
/// Bytes queued with [`push_rx`](Self::push_rx) are handed out by the
/// `UartRx` side; everything written through `UartTx` is kept in a log.
#[derive(Debug, Default)]
pub struct MockSerial {
    rx: Deque<u8, MOCK_RX_CAPACITY>,
    tx: Vec<u8, MOCK_TX_CAPACITY>,
    fail_next_read: bool,
    fail_writes: bool,
}

impl MockSerial {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if the display had sent them
    pub fn push_rx(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        for &byte in bytes {
            self.rx.push_back(byte).map_err(|_| MockError::Full)?;
        }
        Ok(())
    }

    /// Number of received bytes not yet read
    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    /// Everything written so far
    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    /// Forget the transmit log
    pub fn clear_tx(&mut self) {
        self.tx.clear();
    }

    /// Make the next read return an error
    pub fn fail_next_read(&mut self) {
        self.fail_next_read = true;
    }

    /// Make every write fail until re-enabled
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl UartRx for MockSerial {
    type Error = MockError;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(MockError::Read);
        }

        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }
}

impl UartTx for MockSerial {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError::Write);
        }
        self.tx.extend_from_slice(data).map_err(|_| MockError::Full)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rx_fifo_order() {
        let mut serial = MockSerial::new();
        serial.push_rx(&[1, 2, 3]).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(serial.read_available(&mut buf), Ok(2));
        assert_eq!(buf, [1, 2]);
        assert_eq!(serial.try_read_byte(), Ok(Some(3)));
        assert_eq!(serial.try_read_byte(), Ok(None));
    }

    #[test]
    fn test_injected_read_failure_is_one_shot() {
        let mut serial = MockSerial::new();
        serial.push_rx(&[0x66]).unwrap();
        serial.fail_next_read();

        assert_eq!(serial.try_read_byte(), Err(MockError::Read));
        assert_eq!(serial.try_read_byte(), Ok(Some(0x66)));
    }

    #[test]
    fn test_tx_log_and_write_failure() {
        let mut serial = MockSerial::new();
        serial.write_blocking(b"sendme").unwrap();
        assert_eq!(serial.tx(), b"sendme");

        serial.fail_writes(true);
        assert_eq!(serial.write_blocking(b"x"), Err(MockError::Write));
        assert_eq!(serial.tx(), b"sendme");
    }
}
