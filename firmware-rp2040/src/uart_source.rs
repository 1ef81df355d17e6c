//! Byte source over the Bluetooth module's UART.
//!
//! The RFCOMM link terminates in a serial Bluetooth module (HC-05 style) in
//! slave mode, so the controller's stream arrives as plain UART bytes.
//!
//! # Pins
//!
//! Uses UART1:
//! - GPIO 8: TX (to module RX)
//! - GPIO 9: RX (from module TX)

use btpad::{ByteSource, ReadError};
use embassy_rp::uart::{Async, Error as UartError, UartRx};

/// Default baud rate of serial Bluetooth modules.
pub const MODULE_BAUDRATE: u32 = 9600;

/// Convert UART errors to [`ReadError`].
///
/// A helper instead of a `From` impl, since both types are foreign here.
#[inline]
fn uart_error_to_read_error(e: UartError) -> ReadError {
    match e {
        UartError::Framing => ReadError::Framing,
        UartError::Overrun => ReadError::Overrun,
        _ => ReadError::Io,
    }
}

/// UART receiver as a [`ByteSource`].
///
/// Returns one byte per read; the frame accumulator stitches them back into
/// frames.
pub struct UartByteSource<'d> {
    rx: UartRx<'d, Async>,
}

impl<'d> UartByteSource<'d> {
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>) -> Self {
        Self { rx }
    }
}

impl ByteSource for UartByteSource<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        let Some(byte) = buf.first_mut() else {
            return Ok(0);
        };
        self.rx
            .read(core::slice::from_mut(byte))
            .await
            .map_err(uart_error_to_read_error)?;
        Ok(1)
    }
}
