//! UART serial communication abstractions
//!
//! The display link is polled, never awaited: reads return whatever the
//! driver has already buffered and report an empty buffer instead of
//! blocking.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been handed to the driver or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
///
/// Non-blocking: implementations only hand out bytes already received.
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Copy already-received bytes into `buf`
    ///
    /// Returns the number of bytes copied, `0` when nothing is pending.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Take a single pending byte, if any
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read_available(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

impl<T: UartTx + ?Sized> UartTx for &mut T {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_blocking(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

impl<T: UartRx + ?Sized> UartRx for &mut T {
    type Error = T::Error;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_available(buf)
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).try_read_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pending<'a> {
        data: &'a [u8],
    }

    impl UartRx for Pending<'_> {
        type Error = ();

        fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_try_read_byte_drains_in_order() {
        let mut rx = Pending { data: &[0x65, 0x01] };
        assert_eq!(rx.try_read_byte(), Ok(Some(0x65)));
        assert_eq!(rx.try_read_byte(), Ok(Some(0x01)));
        assert_eq!(rx.try_read_byte(), Ok(None));
    }

    #[test]
    fn test_read_through_mut_reference() {
        fn first_byte<R: UartRx>(mut rx: R) -> Result<Option<u8>, R::Error> {
            rx.try_read_byte()
        }

        let mut rx = Pending { data: &[0x70, 0x48] };
        assert_eq!(first_byte(&mut rx), Ok(Some(0x70)));
        assert_eq!(rx.try_read_byte(), Ok(Some(0x48)));
        assert_eq!(rx.try_read_byte(), Ok(None));
    }
}
