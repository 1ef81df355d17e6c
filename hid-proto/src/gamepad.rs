//! Generic 16-button HID gamepad.
//!
//! Report `0x00` carries the button mask little-endian in bytes 3 and 4.

use btpad_core::{ButtonEdges, ButtonEvent, EventSink, KeyCode};

use crate::report::HidDevice;

pub const BUTTON_REPORT: u8 = 0x00;
pub const BUTTON_REPORT_LEN: usize = 5;

#[derive(Debug, Default)]
pub struct HidGamepad {
    buttons: ButtonEdges,
}

impl HidGamepad {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HidDevice for HidGamepad {
    const DRIVER_NAME: &'static str = "hidgamepad";
    const SUPPORTED_REPORTS: &'static [(u8, usize)] = &[(BUTTON_REPORT, BUTTON_REPORT_LEN)];

    fn handle_report<S: EventSink + ?Sized>(&mut self, _report_id: u8, payload: &[u8], sink: &mut S) {
        let mask = u16::from_le_bytes([payload[3], payload[4]]);
        for (bit, action) in self.buttons.update(mask as u32) {
            // Numbered buttons; devices differ too much for named keys.
            sink.button(ButtonEvent::new(action, KeyCode::button(bit + 1)));
        }
    }

    fn reset(&mut self) {
        self.buttons.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::HidDecoder;
    use btpad_core::{InputEvent, ProtocolDecoder};

    type Events = heapless::Vec<InputEvent, 16>;

    fn report(lo: u8, hi: u8) -> [u8; 7] {
        [0xa1, BUTTON_REPORT, 0, 0, 0, lo, hi]
    }

    #[test]
    fn test_bits_map_to_numbered_buttons() {
        let mut decoder = HidDecoder::new(HidGamepad::new());
        let mut events = Events::new();
        decoder.parse(&report(0x01, 0x80), &mut events);
        assert_eq!(
            events,
            [
                InputEvent::Button(ButtonEvent::down(KeyCode::BUTTON_1)),
                InputEvent::Button(ButtonEvent::down(KeyCode::BUTTON_16)),
            ]
        );

        events.clear();
        decoder.parse(&report(0x01, 0x80), &mut events);
        assert!(events.is_empty());

        decoder.parse(&report(0x02, 0x80), &mut events);
        assert_eq!(
            events,
            [
                InputEvent::Button(ButtonEvent::up(KeyCode::BUTTON_1)),
                InputEvent::Button(ButtonEvent::down(KeyCode::BUTTON_2)),
            ]
        );
    }

    #[test]
    fn test_wrong_report_ignored() {
        let mut decoder = HidDecoder::new(HidGamepad::new());
        let mut events = Events::new();
        decoder.parse(&[0xa1, 0x01, 0, 0, 0, 0xff, 0xff], &mut events);
        decoder.parse(&[0xa1, BUTTON_REPORT, 0, 0, 0, 0xff], &mut events);
        assert!(events.is_empty());
    }
}
