//! Packed 2-byte key code decoder.

use btpad_core::{ButtonEvent, EventSink, ProtocolDecoder};

use crate::mapping::{Variant, CODE_MASK};

/// Size of one packed code.
pub const CODE_SIZE: usize = 2;

/// A pair is a code when the first byte has its high bit set and the second
/// does not.
#[inline]
#[must_use]
pub const fn is_code_pair(first: u8, second: u8) -> bool {
    first & 0x80 != 0 && second & 0x80 == 0
}

/// Combine and mask a pair.
#[inline]
#[must_use]
pub const fn packed_code(first: u8, second: u8) -> u16 {
    ((first as u16) << 8 | second as u16) & CODE_MASK
}

/// Table-driven decoder for the BGP100 family.
///
/// The device sends distinct codes for press and release, so no edge state is
/// kept.
#[derive(Debug, Clone, Copy)]
pub struct Bgp100Decoder {
    variant: Variant,
}

impl Bgp100Decoder {
    #[must_use]
    pub const fn new(variant: Variant) -> Self {
        Self { variant }
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }
}

impl ProtocolDecoder for Bgp100Decoder {
    fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
        let mut offset = 0;

        while data.len() - offset >= CODE_SIZE {
            let (first, second) = (data[offset], data[offset + 1]);
            if !is_code_pair(first, second) {
                offset += 1;
                continue;
            }

            let code = packed_code(first, second);
            match self.variant.lookup(code) {
                Some(mapping) => sink.button(ButtonEvent::new(mapping.action, mapping.key)),
                None => warn!(
                    "{}: unmatched code {:x}",
                    self.variant.driver_name(),
                    (first as u16) << 8 | second as u16
                ),
            }
            offset += CODE_SIZE;
        }

        data.len() - offset
    }

    fn reset(&mut self) {}

    fn driver_name(&self) -> &'static str {
        self.variant.driver_name()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use btpad_core::{InputEvent, KeyAction, KeyCode};
    use std::vec::Vec;

    type Sink = heapless::Vec<InputEvent, 16>;

    fn decode(variant: Variant, data: &[u8]) -> (usize, Sink) {
        let mut sink = Sink::new();
        let rest = Bgp100Decoder::new(variant).parse(data, &mut sink);
        (rest, sink)
    }

    fn button(action: KeyAction, key: KeyCode) -> InputEvent {
        InputEvent::Button(ButtonEvent::new(action, key))
    }

    #[test]
    fn test_press_then_release() {
        let (rest, events) = decode(Variant::Bgp100, &[0xb0, 0x49, 0xf0, 0x09]);
        assert_eq!(rest, 0);
        assert_eq!(
            &events[..],
            &[
                button(KeyAction::Down, KeyCode::BUTTON_A),
                button(KeyAction::Up, KeyCode::BUTTON_A),
            ]
        );
    }

    #[test]
    fn test_masking_clone_hardware() {
        let (_, legacy) = decode(Variant::Bgp100, &[0xb6, 0x49]);
        let (_, plain) = decode(Variant::Bgp100, &[0xb0, 0x49]);
        assert_eq!(legacy, plain);
        assert_eq!(packed_code(0xb6, 0x49), 0xb049);
    }

    #[test]
    fn test_resync_after_garbage_byte() {
        let (rest, events) = decode(Variant::Bgp100, &[0xb0, 0x45, 0x9c, 0xf0, 0x05]);
        assert_eq!(rest, 0);
        assert_eq!(
            &events[..],
            &[
                button(KeyAction::Down, KeyCode::DPAD_UP),
                button(KeyAction::Up, KeyCode::DPAD_UP),
            ]
        );
    }

    #[test]
    fn test_trailing_byte_left_unparsed() {
        let (rest, events) = decode(Variant::Bgp100, &[0xb0, 0x4b, 0xf0]);
        assert_eq!(rest, 1);
        assert_eq!(&events[..], &[button(KeyAction::Down, KeyCode::BUTTON_START)]);

        let (rest, _) = decode(Variant::Bgp100, &[0x12]);
        assert_eq!(rest, 1);
    }

    #[test]
    fn test_unmatched_code_consumed() {
        let (rest, events) = decode(Variant::Bgp100, &[0xb0, 0x7f, 0xb0, 0x42]);
        assert_eq!(rest, 0);
        assert_eq!(&events[..], &[button(KeyAction::Down, KeyCode::DPAD_DOWN)]);
    }

    #[test]
    fn test_phonejoy_extra_buttons() {
        let data = [0xb2, 0x4e, 0xf2, 0x0e, 0xb1, 0x4d, 0xb3, 0x4c];
        let (_, events) = decode(Variant::Phonejoy, &data);
        assert_eq!(
            &events[..],
            &[
                button(KeyAction::Down, KeyCode::BUTTON_R2),
                button(KeyAction::Up, KeyCode::BUTTON_R2),
                button(KeyAction::Down, KeyCode::BUTTON_L2),
                button(KeyAction::Down, KeyCode::BUTTON_SELECT),
            ]
        );

        let (_, events) = decode(Variant::Bgp100, &data);
        assert!(events.is_empty());
    }

    #[test]
    fn test_icontrolpad_shares_phonejoy_table() {
        let (_, events) = decode(Variant::IControlPad, &[0xb0, 0x4c, 0xb0, 0x47]);
        assert_eq!(
            &events[..],
            &[
                button(KeyAction::Down, KeyCode::BUTTON_SELECT),
                button(KeyAction::Down, KeyCode::BUTTON_L1),
            ]
        );
    }

    #[test]
    fn test_split_at_every_boundary() {
        let stream = [0xb0, 0x41, 0x33, 0xf0, 0x01, 0xb0, 0x46, 0xf0, 0x06];
        let (_, whole) = decode(Variant::Bgp100, &stream);
        assert_eq!(whole.len(), 4);

        for split in 1..stream.len() {
            let mut decoder = Bgp100Decoder::new(Variant::Bgp100);
            let mut events = Sink::new();
            let rest = decoder.parse(&stream[..split], &mut events);
            let mut joined = Vec::from(&stream[split - rest..split]);
            joined.extend_from_slice(&stream[split..]);
            decoder.parse(&joined, &mut events);
            assert_eq!(events, whole, "split at {}", split);
        }
    }

    #[test]
    fn test_keys_lists_pressable_buttons() {
        assert_eq!(Variant::Bgp100.keys().count(), 11);
        assert_eq!(Variant::Phonejoy.keys().count(), 14);
    }
}
