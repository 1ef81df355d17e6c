//! Protocol decoder trait and error types.

use core::fmt;

use crate::sink::EventSink;

/// A stateful, per-connection protocol decoder.
///
/// `parse` scans `data` left to right, consumes every complete frame it can
/// recognise, emits the resulting events to `sink` in frame order and returns
/// the number of trailing bytes left unparsed. The caller keeps exactly that
/// suffix and presents it again, followed by newly read bytes, on the next
/// call. Bytes that cannot start a frame are skipped one at a time.
///
/// Decoding never blocks and never fails: malformed input is logged and
/// dropped, and the decoder resynchronises on the next valid frame.
pub trait ProtocolDecoder {
    /// Parse buffered bytes, returning the count of unparsed trailing bytes.
    fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize;

    /// Forget all stored edge-detection state.
    fn reset(&mut self);

    /// Name of the driver this decoder implements.
    fn driver_name(&self) -> &'static str;
}

/// Reasons a report-based decoder drops a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Packet too short to carry a transaction header and report id.
    Truncated,
    /// Transaction is not an input data report.
    NotInputReport(u8),
    /// Report id not declared by the device.
    UnknownReportId(u8),
    /// Payload shorter than the device declares for this report id.
    ShortReport {
        report_id: u8,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated => f.write_str("truncated packet"),
            DecodeError::NotInputReport(header) => {
                write!(f, "not an input report (header {:#04x})", header)
            }
            DecodeError::UnknownReportId(id) => write!(f, "unsupported report id {:#04x}", id),
            DecodeError::ShortReport {
                report_id,
                expected,
                actual,
            } => write!(
                f,
                "report {:#04x} too short: {} bytes, expected {}",
                report_id, actual, expected
            ),
        }
    }
}
