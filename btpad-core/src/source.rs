//! Byte source trait and error types.

use core::fmt;
use core::future::Future;

/// Error type for transport reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// Transport I/O error.
    Io,
    /// Line framing error (UART).
    Framing,
    /// Receive overrun, bytes were lost.
    Overrun,
    /// Remote end closed the connection.
    Disconnected,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReadError::Io => "i/o error",
            ReadError::Framing => "framing error",
            ReadError::Overrun => "receive overrun",
            ReadError::Disconnected => "disconnected",
        })
    }
}

/// Async trait for connection-oriented byte streams.
///
/// Chunk boundaries carry no meaning: a protocol frame may be split across
/// any number of reads.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes, returning how many were written.
    ///
    /// May return 0 without the connection being closed.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, ReadError>>;
}

/// [`ByteSource`] over any `embedded-io-async` reader.
///
/// End of stream is reported as [`ReadError::Disconnected`].
#[cfg(feature = "embedded-io")]
pub struct IoSource<R>(pub R);

#[cfg(feature = "embedded-io")]
impl<R: embedded_io_async::Read> ByteSource for IoSource<R> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        use embedded_io_async::{Error as _, ErrorKind};

        match self.0.read(buf).await {
            Ok(0) if !buf.is_empty() => Err(ReadError::Disconnected),
            Ok(n) => Ok(n),
            Err(e) => Err(match e.kind() {
                ErrorKind::NotConnected | ErrorKind::ConnectionReset | ErrorKind::BrokenPipe => {
                    ReadError::Disconnected
                }
                ErrorKind::InvalidData => ReadError::Framing,
                ErrorKind::OutOfMemory => ReadError::Overrun,
                _ => ReadError::Io,
            }),
        }
    }
}
