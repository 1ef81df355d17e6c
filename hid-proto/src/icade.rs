//! iCade arcade cabinet.
//!
//! The cabinet presents itself as a keyboard but sends a different usage for
//! the press and the release of each control, so it needs no edge state.

use btpad_core::{ButtonEvent, EventSink, KeyAction, KeyCode};

use crate::report::HidDevice;

pub const KEYPRESS_REPORT: u8 = 0x01;
pub const KEYPRESS_REPORT_LEN: usize = 8;
pub const EXTENDED_REPORT: u8 = 0x02;
pub const EXTENDED_REPORT_LEN: usize = 3;

const FIRST_USAGE: usize = 2;

/// `(press usage, release usage, key)` for every control.
pub const KEY_PAIRS: [(u8, u8, KeyCode); 12] = [
    (0x1a, 0x08, KeyCode::DPAD_UP),
    (0x1b, 0x1d, KeyCode::DPAD_DOWN),
    (0x04, 0x14, KeyCode::DPAD_LEFT),
    (0x07, 0x06, KeyCode::DPAD_RIGHT),
    (0x1c, 0x17, KeyCode::BUTTON_A),
    (0x18, 0x09, KeyCode::BUTTON_B),
    (0x0c, 0x10, KeyCode::BUTTON_C),
    (0x12, 0x0a, KeyCode::BUTTON_START),
    (0x0b, 0x15, KeyCode::BUTTON_X),
    (0x0d, 0x11, KeyCode::BUTTON_Y),
    (0x0e, 0x13, KeyCode::BUTTON_Z),
    (0x0f, 0x19, KeyCode::BUTTON_SELECT),
];

/// Edge and key for a usage, if it is one of the cabinet's.
#[must_use]
pub fn lookup(usage: u8) -> Option<(KeyAction, KeyCode)> {
    KEY_PAIRS.iter().find_map(|&(down, up, key)| {
        if usage == down {
            Some((KeyAction::Down, key))
        } else if usage == up {
            Some((KeyAction::Up, key))
        } else {
            None
        }
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ICade;

impl HidDevice for ICade {
    const DRIVER_NAME: &'static str = "icade";
    const SUPPORTED_REPORTS: &'static [(u8, usize)] = &[
        (KEYPRESS_REPORT, KEYPRESS_REPORT_LEN),
        (EXTENDED_REPORT, EXTENDED_REPORT_LEN),
    ];

    fn handle_report<S: EventSink + ?Sized>(&mut self, report_id: u8, payload: &[u8], sink: &mut S) {
        if report_id != KEYPRESS_REPORT {
            debug!("icade: ignoring report {:x}", report_id);
            return;
        }
        let usages = payload[FIRST_USAGE..].iter().filter(|&&u| u != 0);
        for (action, key) in usages.filter_map(|&u| lookup(u)) {
            sink.button(ButtonEvent::new(action, key));
        }
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::HidDecoder;
    use btpad_core::{InputEvent, ProtocolDecoder};

    type Events = heapless::Vec<InputEvent, 8>;

    fn feed(decoder: &mut HidDecoder<ICade>, usages: [u8; 6]) -> Events {
        let mut packet = [0u8; 10];
        packet[..4].copy_from_slice(&[0xa1, KEYPRESS_REPORT, 0, 0]);
        packet[4..].copy_from_slice(&usages);
        let mut events = Events::new();
        decoder.parse(&packet, &mut events);
        events
    }

    #[test]
    fn test_press_and_release_codes() {
        let mut decoder = HidDecoder::new(ICade);
        let events = feed(&mut decoder, [0x1a, 0, 0, 0, 0, 0]);
        assert_eq!(events, [InputEvent::Button(ButtonEvent::down(KeyCode::DPAD_UP))]);

        let events = feed(&mut decoder, [0x08, 0, 0, 0, 0, 0]);
        assert_eq!(events, [InputEvent::Button(ButtonEvent::up(KeyCode::DPAD_UP))]);
    }

    #[test]
    fn test_repeated_code_repeats_event() {
        let mut decoder = HidDecoder::new(ICade);
        assert_eq!(feed(&mut decoder, [0x1c, 0, 0, 0, 0, 0]).len(), 1);
        assert_eq!(feed(&mut decoder, [0x1c, 0, 0, 0, 0, 0]).len(), 1);
    }

    #[test]
    fn test_every_slot_scanned() {
        let mut decoder = HidDecoder::new(ICade);
        let events = feed(&mut decoder, [0x12, 0x33, 0x0f, 0, 0, 0x19]);
        assert_eq!(
            events,
            [
                InputEvent::Button(ButtonEvent::down(KeyCode::BUTTON_START)),
                InputEvent::Button(ButtonEvent::down(KeyCode::BUTTON_SELECT)),
                InputEvent::Button(ButtonEvent::up(KeyCode::BUTTON_SELECT)),
            ]
        );
    }

    #[test]
    fn test_extended_report_accepted_silently() {
        let mut decoder = HidDecoder::new(ICade);
        let mut events = Events::new();
        assert_eq!(decoder.parse(&[0xa1, EXTENDED_REPORT, 0xff, 0xff, 0xff], &mut events), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_tables_disjoint() {
        for (i, &(down, up, _)) in KEY_PAIRS.iter().enumerate() {
            assert_ne!(down, up);
            for &(d, u, _) in &KEY_PAIRS[i + 1..] {
                assert!(d != down && d != up && u != down && u != up);
            }
        }
    }
}
