//! Zeemote / SteelSeries frame decoder.
//!
//! Frames are length prefixed: `[length][0xA1][type][payload...]`, where the
//! whole frame is `length + 1` bytes long.

use btpad_core::{
    AnalogAxis, ButtonEdges, ButtonEvent, EventSink, ProtocolDecoder, Threshold,
    ANALOG_NUB_THRESHOLD,
};

use crate::mapping::{button_key, ANALOG_KEYS};

/// Second byte of every frame.
pub const MAGIC: u8 = 0xA1;

/// Pressed buttons, original Zeemote numbering.
pub const BUTTON_UPDATE: u8 = 0x07;

/// Pressed buttons, SteelSeries Free numbering.
pub const BUTTON_UPDATE_STEELSERIES: u8 = 0x1c;

/// Analog stick position.
pub const DIRECTION_UPDATE: u8 = 0x08;

/// Length byte, magic and type.
pub const HEADER_SIZE: usize = 3;

/// Button indices tracked per numbering scheme.
pub const MAX_BUTTONS: u8 = 16;

/// Analog sticks supported, two axes each.
pub const MAX_STICKS: usize = ANALOG_KEYS.len() / 4;

const AXIS_COUNT: usize = MAX_STICKS * 2;

const THRESHOLD: Threshold = Threshold::Exclusive(ANALOG_NUB_THRESHOLD);

/// Decoder state for one Zeemote or SteelSeries controller.
#[derive(Debug, Default)]
pub struct ZeemoteDecoder {
    legacy_buttons: ButtonEdges,
    steelseries_buttons: ButtonEdges,
    axes: [AnalogAxis; AXIS_COUNT],
}

impl ZeemoteDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle_frame<S: EventSink + ?Sized>(&mut self, frame: &[u8], sink: &mut S) {
        let payload = &frame[HEADER_SIZE..];
        match frame[2] {
            BUTTON_UPDATE => report_buttons(&mut self.legacy_buttons, payload, sink),
            BUTTON_UPDATE_STEELSERIES => {
                report_buttons(&mut self.steelseries_buttons, payload, sink)
            }
            DIRECTION_UPDATE => self.report_direction(payload, sink),
            other => debug!("zeemote: ignoring frame type {:x}", other),
        }
    }

    /// `[stick, x, y]`, both axes signed.
    fn report_direction<S: EventSink + ?Sized>(&mut self, payload: &[u8], sink: &mut S) {
        let &[stick, x, y, ..] = payload else {
            debug!("zeemote: short direction frame ({} bytes)", payload.len());
            return;
        };
        let stick = stick as usize;
        if stick >= MAX_STICKS {
            debug!("zeemote: ignoring stick {}", stick);
            return;
        }

        let first = stick * 2;
        for (i, raw) in [x, y].into_iter().enumerate() {
            let value = raw as i8 as i16;
            if self.axes[first + i].set_value(value) {
                sink.axis((first + i) as u8, value);
            }
        }

        for axis in first..first + 2 {
            let (positive, negative) = THRESHOLD.classify(self.axes[axis].value());
            let (pos, neg) = self.axes[axis].set_emulation(positive, negative);
            if let Some(action) = pos {
                sink.button(ButtonEvent::new(action, ANALOG_KEYS[axis * 2]).emulated());
            }
            if let Some(action) = neg {
                sink.button(ButtonEvent::new(action, ANALOG_KEYS[axis * 2 + 1]).emulated());
            }
        }
    }
}

/// Payload is the sparse list of currently pressed indices.
fn report_buttons<S: EventSink + ?Sized>(edges: &mut ButtonEdges, payload: &[u8], sink: &mut S) {
    let pressed = payload
        .iter()
        .filter(|&&index| index < MAX_BUTTONS)
        .fold(0u32, |mask, &index| mask | 1 << index);

    for (index, action) in edges.update(pressed) {
        let key = button_key(index);
        if key.is_mapped() {
            sink.button(ButtonEvent::new(action, key));
        }
    }
}

impl ProtocolDecoder for ZeemoteDecoder {
    fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
        let mut offset = 0;

        while data.len() - offset >= HEADER_SIZE {
            let rest = &data[offset..];
            let size = rest[0] as usize + 1;

            if rest[1] != MAGIC || size < HEADER_SIZE {
                trace!("zeemote: resync, skipping {:x}", rest[0]);
                offset += 1;
                continue;
            }
            if rest.len() < size {
                // Partial frame, wait for the rest.
                break;
            }

            self.handle_frame(&rest[..size], sink);
            offset += size;
        }

        data.len() - offset
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn driver_name(&self) -> &'static str {
        crate::DRIVER_NAME
    }
}
