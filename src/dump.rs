//! Raw data dump driver.

use btpad_core::{EventSink, Hex, ProtocolDecoder};

pub const DRIVER_NAME: &str = "dump";

/// Logs every chunk as hex and emits nothing.
///
/// Useful for capturing the wire format of an unsupported controller.
#[derive(Debug, Default, Clone, Copy)]
pub struct DumpDecoder {
    bytes_seen: usize,
}

impl DumpDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes_seen: 0 }
    }

    /// Total bytes consumed since the last reset.
    #[must_use]
    pub const fn bytes_seen(&self) -> usize {
        self.bytes_seen
    }
}

impl ProtocolDecoder for DumpDecoder {
    fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], _sink: &mut S) -> usize {
        if !data.is_empty() {
            info!("dump: {} bytes: {}", data.len(), Hex(data));
            self.bytes_seen = self.bytes_seen.saturating_add(data.len());
        }
        0
    }

    fn reset(&mut self) {
        self.bytes_seen = 0;
    }

    fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }
}
