//! Boot-protocol style HID keyboard with a media key report.
//!
//! Report `0x01` (8 bytes):
//!
//! ```text
//! [modifiers][reserved][usage 0]..[usage 5]
//! ```
//!
//! Report `0x02` (3 bytes) is a big-endian 24-bit mask of media keys.
//!
//! Modifier bits become their own key events, and the six usage slots are
//! diffed by set membership against the previous report: released keys are
//! reported first, then newly pressed ones, both in slot order.

use btpad_core::{ButtonEdges, ButtonEvent, EventSink, KeyAction, KeyCode, Modifiers};
use heapless::Vec;

use crate::report::HidDevice;

pub const KEYPRESS_REPORT: u8 = 0x01;
pub const KEYPRESS_REPORT_LEN: usize = 8;
pub const EXTENDED_REPORT: u8 = 0x02;
pub const EXTENDED_REPORT_LEN: usize = 3;

/// Non-modifier keys a single report can hold.
pub const MAX_PRESSED: usize = 6;

const FIRST_USAGE: usize = 2;

/// Modifier bits of the first report byte.
pub mod modifier {
    pub const LEFT_CTRL: u8 = 0x01;
    pub const LEFT_SHIFT: u8 = 0x02;
    pub const LEFT_ALT: u8 = 0x04;
    pub const LEFT_GUI: u8 = 0x08;
    pub const RIGHT_CTRL: u8 = 0x10;
    pub const RIGHT_SHIFT: u8 = 0x20;
    pub const RIGHT_ALT: u8 = 0x40;
    pub const RIGHT_GUI: u8 = 0x80;
}

/// Modifier bit, meta flags it sets and the key reported for it.
///
/// The order is the order modifier edges are emitted in.
const MODIFIER_KEYS: [(u8, Modifiers, KeyCode); 8] = [
    (modifier::LEFT_ALT, Modifiers(Modifiers::ALT_LEFT_ON.0 | Modifiers::ALT_ON.0), KeyCode::ALT_LEFT),
    (modifier::RIGHT_ALT, Modifiers(Modifiers::ALT_RIGHT_ON.0 | Modifiers::ALT_ON.0), KeyCode::ALT_RIGHT),
    (modifier::LEFT_CTRL, Modifiers(Modifiers::CTRL_LEFT_ON.0 | Modifiers::CTRL_ON.0), KeyCode::CTRL_LEFT),
    (modifier::RIGHT_CTRL, Modifiers(Modifiers::CTRL_RIGHT_ON.0 | Modifiers::CTRL_ON.0), KeyCode::CTRL_RIGHT),
    (modifier::LEFT_SHIFT, Modifiers(Modifiers::SHIFT_LEFT_ON.0 | Modifiers::SHIFT_ON.0), KeyCode::SHIFT_LEFT),
    (modifier::RIGHT_SHIFT, Modifiers(Modifiers::SHIFT_RIGHT_ON.0 | Modifiers::SHIFT_ON.0), KeyCode::SHIFT_RIGHT),
    (modifier::LEFT_GUI, Modifiers(Modifiers::META_LEFT_ON.0 | Modifiers::META_ON.0), KeyCode::META_LEFT),
    (modifier::RIGHT_GUI, Modifiers(Modifiers::META_RIGHT_ON.0 | Modifiers::META_ON.0), KeyCode::META_RIGHT),
];

/// Meta flags for a modifier byte.
#[must_use]
pub fn parse_modifiers(byte: u8) -> Modifiers {
    MODIFIER_KEYS
        .iter()
        .filter(|(bit, _, _)| byte & bit != 0)
        .fold(Modifiers::NONE, |acc, &(_, flags, _)| acc | flags)
}

/// Keys of the extended report, by bit. `NONE` bits are ignored.
pub const EXTENDED_KEYS: [KeyCode; 24] = {
    let mut keys = [KeyCode::NONE; 24];
    keys[8] = KeyCode::ENVELOPE;
    keys[9] = KeyCode::HOME;
    keys[16] = KeyCode::VOLUME_UP;
    keys[17] = KeyCode::VOLUME_DOWN;
    keys[18] = KeyCode::MUTE;
    keys[19] = KeyCode::MEDIA_NEXT;
    keys[20] = KeyCode::MEDIA_PLAY_PAUSE;
    keys[21] = KeyCode::MEDIA_PREVIOUS;
    keys[22] = KeyCode::MEDIA_STOP;
    keys[23] = KeyCode::LANGUAGE_SWITCH;
    keys
};

/// HID keyboard usage to key code. Unlisted usages map to `NONE`.
pub const USAGE_TABLE: [KeyCode; 256] = build_usage_table();

const fn build_usage_table() -> [KeyCode; 256] {
    let mut t = [KeyCode::NONE; 256];

    // Letters are contiguous in both tables.
    let mut i = 0;
    while i < 26 {
        t[0x04 + i] = KeyCode(KeyCode::A.0 + i as u16);
        i += 1;
    }

    // 1..9 then 0.
    let mut i = 0;
    while i < 9 {
        t[0x1e + i] = KeyCode(KeyCode::KEY_1.0 + i as u16);
        i += 1;
    }
    t[0x27] = KeyCode::KEY_0;

    t[0x28] = KeyCode::ENTER;
    t[0x29] = KeyCode::ESCAPE;
    t[0x2a] = KeyCode::DEL;
    t[0x2b] = KeyCode::TAB;
    t[0x2c] = KeyCode::SPACE;
    t[0x2d] = KeyCode::MINUS;
    t[0x2e] = KeyCode::EQUALS;
    t[0x2f] = KeyCode::LEFT_BRACKET;
    t[0x30] = KeyCode::RIGHT_BRACKET;
    t[0x31] = KeyCode::BACKSLASH;
    t[0x33] = KeyCode::SEMICOLON;
    t[0x34] = KeyCode::APOSTROPHE;
    t[0x35] = KeyCode::GRAVE;
    t[0x36] = KeyCode::COMMA;
    t[0x37] = KeyCode::PERIOD;
    t[0x38] = KeyCode::SLASH;

    // F1..F12
    let mut i = 0;
    while i < 12 {
        t[0x3a + i] = KeyCode(KeyCode::F1.0 + i as u16);
        i += 1;
    }

    t[0x49] = KeyCode::INSERT;
    t[0x4a] = KeyCode::PAGE_DOWN;
    t[0x4b] = KeyCode::PAGE_UP;
    t[0x4c] = KeyCode::MOVE_END;
    t[0x4d] = KeyCode::MOVE_HOME;
    t[0x4f] = KeyCode::DPAD_RIGHT;
    t[0x50] = KeyCode::DPAD_LEFT;
    t[0x51] = KeyCode::DPAD_DOWN;
    t[0x52] = KeyCode::DPAD_UP;
    t
}

#[inline]
#[must_use]
pub const fn usage_to_key(usage: u8) -> KeyCode {
    USAGE_TABLE[usage as usize]
}

/// Keyboard state: modifiers, pressed keys and media keys.
#[derive(Debug, Default)]
pub struct HidKeyboard {
    modifier_byte: u8,
    modifiers: Modifiers,
    pressed: Vec<KeyCode, MAX_PRESSED>,
    extended: ButtonEdges,
}

impl HidKeyboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Meta flags of the last keypress report.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Keys held in the last keypress report, in slot order.
    #[must_use]
    pub fn pressed(&self) -> &[KeyCode] {
        &self.pressed
    }

    fn handle_keypress<S: EventSink + ?Sized>(&mut self, payload: &[u8], sink: &mut S) {
        let byte = payload[0];
        let changed = self.modifier_byte ^ byte;
        for &(bit, _, key) in MODIFIER_KEYS.iter().filter(|(bit, _, _)| changed & bit != 0) {
            sink.button(ButtonEvent::new(KeyAction::from_pressed(byte & bit != 0), key));
        }
        self.modifier_byte = byte;
        self.modifiers = parse_modifiers(byte);

        let mut current: Vec<KeyCode, MAX_PRESSED> = Vec::new();
        let slots = &payload[FIRST_USAGE..KEYPRESS_REPORT_LEN];
        for key in slots.iter().map(|&usage| usage_to_key(usage)) {
            if key.is_mapped() && !current.contains(&key) {
                // Cannot overflow: one slot per entry.
                let _ = current.push(key);
            }
        }

        for &key in self.pressed.iter().filter(|key| !current.contains(key)) {
            sink.button(ButtonEvent::up(key).with_modifiers(self.modifiers));
        }
        for &key in current.iter().filter(|key| !self.pressed.contains(key)) {
            sink.button(ButtonEvent::down(key).with_modifiers(self.modifiers));
        }
        self.pressed = current;
    }

    fn handle_extended<S: EventSink + ?Sized>(&mut self, payload: &[u8], sink: &mut S) {
        let mask = u32::from_be_bytes([0, payload[0], payload[1], payload[2]]);
        for (bit, action) in self.extended.update(mask) {
            let key = EXTENDED_KEYS[bit as usize];
            if key.is_mapped() {
                sink.button(ButtonEvent::new(action, key).with_modifiers(self.modifiers));
            }
        }
    }
}

impl HidDevice for HidKeyboard {
    const DRIVER_NAME: &'static str = "hidkeyboard";
    const SUPPORTED_REPORTS: &'static [(u8, usize)] = &[
        (KEYPRESS_REPORT, KEYPRESS_REPORT_LEN),
        (EXTENDED_REPORT, EXTENDED_REPORT_LEN),
    ];

    fn handle_report<S: EventSink + ?Sized>(&mut self, report_id: u8, payload: &[u8], sink: &mut S) {
        match report_id {
            KEYPRESS_REPORT => self.handle_keypress(payload, sink),
            EXTENDED_REPORT => self.handle_extended(payload, sink),
            _ => {}
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
