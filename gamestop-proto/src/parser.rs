//! GameStop frame decoder.
//!
//! Every frame starts with `0xA1` and a subtype byte that fixes its length.
//! Only message frames carry input; header and battery frames are skipped.

use btpad_core::{
    AnalogAxis, ButtonEdges, ButtonEvent, EventSink, KeyCode, ProtocolDecoder, Threshold,
    ANALOG_NUB_THRESHOLD,
};

/// First byte of every frame.
pub const MAGIC: u8 = 0xA1;

pub const SUBTYPE_BATTERY: u8 = 0xff;
pub const SUBTYPE_HEADER: u8 = 0xfe;
pub const SUBTYPE_MESSAGE: u8 = 0x01;

pub const BATTERY_LENGTH: usize = 7;
pub const HEADER_LENGTH: usize = 18;
pub const MESSAGE_LENGTH: usize = 8;

/// Buttons tracked from the 16-bit mask.
pub const SUPPORTED_BUTTONS: u32 = 14;

pub const AXIS_COUNT: usize = 4;

/// The controller reports this bit inverted.
const INVERTED_BUTTON: u16 = 1 << 8;

const BUTTON_MASK: u32 = (1 << SUPPORTED_BUTTONS) - 1;

const THRESHOLD: Threshold = Threshold::Exclusive(ANALOG_NUB_THRESHOLD);

/// Key emitted for each bit of the button mask.
pub const BUTTON_KEYS: [KeyCode; 16] = [
    KeyCode::BUTTON_1,
    KeyCode::BUTTON_2,
    KeyCode::BUTTON_3,
    KeyCode::BUTTON_4,
    KeyCode::DPAD_UP,
    KeyCode::DPAD_LEFT,
    KeyCode::DPAD_DOWN,
    KeyCode::DPAD_RIGHT,
    KeyCode::BUTTON_SELECT,
    KeyCode::BUTTON_START,
    KeyCode::BUTTON_5, // L3
    KeyCode::BUTTON_6, // R3
    KeyCode::BUTTON_L1,
    KeyCode::BUTTON_L2,
    KeyCode::BUTTON_R1,
    KeyCode::BUTTON_R2,
];

/// Emulated keys: `[axis * 2]` above the threshold, `[axis * 2 + 1]` below.
pub const ANALOG_KEYS: [KeyCode; AXIS_COUNT * 2] = [
    KeyCode::W, // left knob right
    KeyCode::A, // left knob left
    KeyCode::S, // left knob down
    KeyCode::D, // left knob up
    KeyCode::KEY_6,
    KeyCode::KEY_4,
    KeyCode::KEY_5,
    KeyCode::KEY_8,
];

/// Fixed-length frame kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    Battery,
    Header,
    Message,
}

impl FrameKind {
    #[must_use]
    pub const fn from_subtype(subtype: u8) -> Option<Self> {
        match subtype {
            SUBTYPE_BATTERY => Some(FrameKind::Battery),
            SUBTYPE_HEADER => Some(FrameKind::Header),
            SUBTYPE_MESSAGE => Some(FrameKind::Message),
            _ => None,
        }
    }

    /// Total frame length including magic and subtype.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            FrameKind::Battery => BATTERY_LENGTH,
            FrameKind::Header => HEADER_LENGTH,
            FrameKind::Message => MESSAGE_LENGTH,
        }
    }
}

/// Input carried by one message frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    /// Centered axis values, `-128..=127`.
    pub axes: [i16; AXIS_COUNT],
    /// Button mask with the inverted bit already corrected.
    pub buttons: u16,
}

impl Report {
    /// Decode `[0xA1, 0x01, ax0, ax1, ax2, ax3, buttons_hi, buttons_lo]`.
    #[must_use]
    pub fn from_frame(frame: &[u8; MESSAGE_LENGTH]) -> Self {
        let mut axes = [0i16; AXIS_COUNT];
        for (axis, &raw) in axes.iter_mut().zip(&frame[2..6]) {
            *axis = raw as i16 - 0x80;
        }
        let buttons = u16::from_be_bytes([frame[6], frame[7]]) ^ INVERTED_BUTTON;
        Self { axes, buttons }
    }
}

/// Decoder state for one GameStop controller.
#[derive(Debug, Default)]
pub struct GameStopDecoder {
    buttons: ButtonEdges,
    axes: [AnalogAxis; AXIS_COUNT],
}

impl GameStopDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle_report<S: EventSink + ?Sized>(&mut self, report: Report, sink: &mut S) {
        for (bit, action) in self.buttons.update(report.buttons as u32 & BUTTON_MASK) {
            sink.button(ButtonEvent::new(action, BUTTON_KEYS[bit as usize]));
        }

        for (i, &value) in report.axes.iter().enumerate() {
            let axis = &mut self.axes[i];
            let (positive, negative) = THRESHOLD.classify(value);
            let (pos, neg) = axis.set_emulation(positive, negative);
            if let Some(action) = pos {
                sink.button(ButtonEvent::new(action, ANALOG_KEYS[i * 2]).emulated());
            }
            if let Some(action) = neg {
                sink.button(ButtonEvent::new(action, ANALOG_KEYS[i * 2 + 1]).emulated());
            }
            if axis.set_value(value) {
                sink.axis(i as u8, value);
            }
        }
    }
}

impl ProtocolDecoder for GameStopDecoder {
    fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
        let mut offset = 0;

        while data.len() - offset >= 2 {
            let rest = &data[offset..];
            if rest[0] != MAGIC {
                trace!("gamestop: resync, skipping {:x}", rest[0]);
                offset += 1;
                continue;
            }

            let Some(kind) = FrameKind::from_subtype(rest[1]) else {
                // Length unknown, nothing after this can be trusted.
                warn!(
                    "gamestop: unknown frame type {:x}, dropping {} bytes",
                    rest[1],
                    rest.len()
                );
                return 0;
            };
            let Some(frame) = rest.get(..kind.len()) else {
                break;
            };

            match (kind, <&[u8; MESSAGE_LENGTH]>::try_from(frame)) {
                (FrameKind::Message, Ok(message)) => {
                    self.handle_report(Report::from_frame(message), sink)
                }
                _ => trace!("gamestop: skipping {:?} frame", kind),
            }
            offset += kind.len();
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

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use btpad_core::{AxisEvent, InputEvent, KeyAction};
    use std::vec::Vec;

    type Sink = heapless::Vec<InputEvent, 32>;

    /// Message frame with centered axes given as offsets and the raw (wire)
    /// button mask.
    fn message(axes: [i8; 4], wire_buttons: u16) -> [u8; MESSAGE_LENGTH] {
        let [hi, lo] = wire_buttons.to_be_bytes();
        let mut frame = [MAGIC, SUBTYPE_MESSAGE, 0, 0, 0, 0, hi, lo];
        for (dst, &v) in frame[2..6].iter_mut().zip(&axes) {
            *dst = (v as i16 + 0x80) as u8;
        }
        frame
    }

    /// Wire mask for "nothing pressed".
    const IDLE: u16 = INVERTED_BUTTON;

    fn decode(decoder: &mut GameStopDecoder, data: &[u8]) -> (usize, Sink) {
        let mut sink = Sink::new();
        let rest = decoder.parse(data, &mut sink);
        (rest, sink)
    }

    fn button(action: KeyAction, key: KeyCode) -> InputEvent {
        InputEvent::Button(ButtonEvent::new(action, key))
    }

    #[test]
    fn test_idle_message_is_silent() {
        let mut decoder = GameStopDecoder::new();
        let (rest, events) = decode(&mut decoder, &message([0; 4], IDLE));
        assert_eq!(rest, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_inverted_bit_corrected() {
        let report = Report::from_frame(&message([0; 4], 0x0000));
        assert_eq!(report.buttons, INVERTED_BUTTON);

        let mut decoder = GameStopDecoder::new();
        let (_, events) = decode(&mut decoder, &message([0; 4], 0x0000));
        assert_eq!(
            &events[..],
            &[button(KeyAction::Down, KeyCode::BUTTON_SELECT)]
        );
    }

    #[test]
    fn test_button_edges_and_steady_state() {
        let mut decoder = GameStopDecoder::new();
        let pressed = message([0; 4], IDLE | 0b1_0001);

        let (_, events) = decode(&mut decoder, &pressed);
        assert_eq!(
            &events[..],
            &[
                button(KeyAction::Down, KeyCode::BUTTON_1),
                button(KeyAction::Down, KeyCode::DPAD_UP),
            ]
        );

        let (_, events) = decode(&mut decoder, &pressed);
        assert!(events.is_empty());

        let (_, events) = decode(&mut decoder, &message([0; 4], IDLE | 0b1_0000));
        assert_eq!(&events[..], &[button(KeyAction::Up, KeyCode::BUTTON_1)]);
    }

    #[test]
    fn test_high_bits_ignored() {
        let mut decoder = GameStopDecoder::new();
        let (_, events) = decode(&mut decoder, &message([0; 4], IDLE | 0xc000));
        assert!(events.is_empty());
    }

    #[test]
    fn test_axis_threshold_uses_both_keys() {
        let mut decoder = GameStopDecoder::new();
        let mut events = Sink::new();
        decoder.parse(&message([100, -100, 0, 0], IDLE), &mut events);
        decoder.parse(&message([0, 0, 0, 0], IDLE), &mut events);

        assert_eq!(
            &events[..],
            &[
                InputEvent::Button(ButtonEvent::down(KeyCode::W).emulated()),
                InputEvent::Axis(AxisEvent::new(0, 100)),
                InputEvent::Button(ButtonEvent::down(KeyCode::D).emulated()),
                InputEvent::Axis(AxisEvent::new(1, -100)),
                InputEvent::Button(ButtonEvent::up(KeyCode::W).emulated()),
                InputEvent::Axis(AxisEvent::new(0, 0)),
                InputEvent::Button(ButtonEvent::up(KeyCode::D).emulated()),
                InputEvent::Axis(AxisEvent::new(1, 0)),
            ]
        );
    }

    #[test]
    fn test_header_and_battery_skipped() {
        let mut decoder = GameStopDecoder::new();
        let mut data = Vec::new();
        data.extend_from_slice(&[MAGIC, SUBTYPE_HEADER]);
        data.extend_from_slice(&[0x55; HEADER_LENGTH - 2]);
        data.extend_from_slice(&[MAGIC, SUBTYPE_BATTERY, 1, 2, 3, 4, 5]);
        data.extend_from_slice(&message([0; 4], IDLE | 0x0001));

        let (rest, events) = decode(&mut decoder, &data);
        assert_eq!(rest, 0);
        assert_eq!(&events[..], &[button(KeyAction::Down, KeyCode::BUTTON_1)]);
    }

    #[test]
    fn test_incomplete_frame_retained() {
        let mut decoder = GameStopDecoder::new();
        let frame = message([0; 4], IDLE | 0x0002);
        let (rest, events) = decode(&mut decoder, &frame[..5]);
        assert_eq!(rest, 5);
        assert!(events.is_empty());

        let (rest, _) = decode(&mut decoder, &[MAGIC, SUBTYPE_HEADER, 0, 0]);
        assert_eq!(rest, 4);
    }

    #[test]
    fn test_unknown_subtype_drops_rest() {
        let mut decoder = GameStopDecoder::new();
        let mut data = Vec::from(&[MAGIC, 0x42, 0x00][..]);
        data.extend_from_slice(&message([0; 4], IDLE | 0x0001));

        let (rest, events) = decode(&mut decoder, &data);
        assert_eq!(rest, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_leading_garbage_skipped() {
        let mut decoder = GameStopDecoder::new();
        let mut data = Vec::from(&[0x00, 0x13][..]);
        data.extend_from_slice(&message([0; 4], IDLE | 0x0004));

        let (rest, events) = decode(&mut decoder, &data);
        assert_eq!(rest, 0);
        assert_eq!(&events[..], &[button(KeyAction::Down, KeyCode::BUTTON_3)]);
    }

    #[test]
    fn test_split_at_every_boundary() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&[MAGIC, SUBTYPE_BATTERY, 9, 9, 9, 9, 9]);
        stream.extend_from_slice(&message([90, 0, -90, 0], IDLE | 0x0200));
        stream.extend_from_slice(&message([0, 0, 0, 0], IDLE));

        let mut whole = Sink::new();
        assert_eq!(GameStopDecoder::new().parse(&stream, &mut whole), 0);
        assert_eq!(whole.len(), 10);

        for split in 1..stream.len() {
            let mut decoder = GameStopDecoder::new();
            let mut events = Sink::new();
            let rest = decoder.parse(&stream[..split], &mut events);
            let mut joined = Vec::from(&stream[split - rest..split]);
            joined.extend_from_slice(&stream[split..]);
            assert_eq!(decoder.parse(&joined, &mut events), 0);
            assert_eq!(events, whole, "split at {}", split);
        }
    }
}
