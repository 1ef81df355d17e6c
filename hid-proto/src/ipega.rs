//! ipega gamepad.
//!
//! Report `0x07`:
//!
//! ```text
//! [lx][ly][rx][ry][dpad][buttons hi][buttons lo][?]
//! ```
//!
//! Sticks are unsigned with `0x80` at rest. The D-pad is a compass value
//! `0..=7` clockwise from up; anything else means released.

use btpad_core::{
    AnalogAxis, ButtonEdges, ButtonEvent, EventSink, KeyAction, KeyCode, Threshold,
    ANALOG_NUB_THRESHOLD,
};

use crate::report::HidDevice;

pub const INPUT_REPORT: u8 = 0x07;
pub const INPUT_REPORT_LEN: usize = 8;

pub const AXIS_COUNT: usize = 4;

const DPAD_BYTE: usize = 4;
const BUTTONS_HI: usize = 5;
const BUTTONS_LO: usize = 6;

const AXIS_CENTER: i16 = 0x80;

const THRESHOLD: Threshold = Threshold::Inclusive(ANALOG_NUB_THRESHOLD);

/// Direction bits (up, right, down, left) per compass position.
pub const DPAD_MAP: [u8; 8] = [0b0001, 0b0011, 0b0010, 0b0110, 0b0100, 0b1100, 0b1000, 0b1001];

pub const DPAD_KEYS: [KeyCode; 4] = [
    KeyCode::DPAD_UP,
    KeyCode::DPAD_RIGHT,
    KeyCode::DPAD_DOWN,
    KeyCode::DPAD_LEFT,
];

/// Button mask bits, `buttons hi << 8 | buttons lo`.
pub const BUTTON_KEYS: [KeyCode; 16] = [
    KeyCode::BUTTON_SELECT,
    KeyCode::BUTTON_START,
    KeyCode::NONE,
    KeyCode::NONE,
    KeyCode::NONE,
    KeyCode::NONE,
    KeyCode::NONE,
    KeyCode::NONE,
    KeyCode::BUTTON_X,
    KeyCode::BUTTON_A,
    KeyCode::BUTTON_B,
    KeyCode::BUTTON_Y,
    KeyCode::BUTTON_L1,
    KeyCode::BUTTON_R1,
    KeyCode::NONE,
    KeyCode::NONE,
];

/// Emulated keys, positive then negative, per axis.
pub const ANALOG_KEYS: [KeyCode; AXIS_COUNT * 2] = [
    KeyCode::D,
    KeyCode::A,
    KeyCode::S,
    KeyCode::W,
    KeyCode::KEY_6,
    KeyCode::KEY_4,
    KeyCode::KEY_5,
    KeyCode::KEY_8,
];

/// Direction bits for a compass byte.
#[inline]
#[must_use]
pub fn dpad_bits(value: u8) -> u8 {
    DPAD_MAP.get(value as usize).copied().unwrap_or(0)
}

#[derive(Debug, Default)]
pub struct HidIpega {
    dpad: ButtonEdges,
    axes: [AnalogAxis; AXIS_COUNT],
    buttons: ButtonEdges,
}

impl HidIpega {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn report_dpad<S: EventSink + ?Sized>(&mut self, value: u8, sink: &mut S) {
        for (bit, action) in self.dpad.update(dpad_bits(value) as u32) {
            sink.button(ButtonEvent::new(action, DPAD_KEYS[bit as usize]));
        }
    }

    fn report_axes<S: EventSink + ?Sized>(&mut self, raw: &[u8], sink: &mut S) {
        for (i, (axis, &byte)) in self.axes.iter_mut().zip(raw).enumerate() {
            let value = byte as i16 - AXIS_CENTER;
            if !axis.set_value(value) {
                continue;
            }
            sink.axis(i as u8, value);

            let (positive, negative) = THRESHOLD.classify(value);
            let (pos, neg) = axis.set_emulation(positive, negative);
            emit_emulated(sink, pos, ANALOG_KEYS[i * 2]);
            emit_emulated(sink, neg, ANALOG_KEYS[i * 2 + 1]);
        }
    }

    fn report_buttons<S: EventSink + ?Sized>(&mut self, mask: u16, sink: &mut S) {
        for (bit, action) in self.buttons.update(mask as u32) {
            let key = BUTTON_KEYS[bit as usize];
            if key.is_mapped() {
                sink.button(ButtonEvent::new(action, key));
            }
        }
    }
}

fn emit_emulated<S: EventSink + ?Sized>(sink: &mut S, action: Option<KeyAction>, key: KeyCode) {
    if let Some(action) = action {
        sink.button(ButtonEvent::new(action, key).emulated());
    }
}

impl HidDevice for HidIpega {
    const DRIVER_NAME: &'static str = "ipega";
    const SUPPORTED_REPORTS: &'static [(u8, usize)] = &[(INPUT_REPORT, INPUT_REPORT_LEN)];

    fn handle_report<S: EventSink + ?Sized>(&mut self, _report_id: u8, payload: &[u8], sink: &mut S) {
        self.report_dpad(payload[DPAD_BYTE], sink);
        self.report_axes(&payload[..AXIS_COUNT], sink);
        let mask = u16::from_be_bytes([payload[BUTTONS_HI], payload[BUTTONS_LO]]);
        self.report_buttons(mask, sink);
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
