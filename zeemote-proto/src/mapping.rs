//! Button index and analog direction to key code tables.

use btpad_core::KeyCode;

/// Key emitted for each button index, shared by the legacy and SteelSeries
/// numbering. Indices past the end are tracked but not reported.
pub const BUTTON_KEYS: [KeyCode; 12] = [
    KeyCode::BUTTON_A,
    KeyCode::BUTTON_B,
    KeyCode::BUTTON_C,
    KeyCode::BUTTON_X,
    KeyCode::W, // SteelSeries D-pad up
    KeyCode::A, // SteelSeries D-pad down
    KeyCode::S, // SteelSeries D-pad left
    KeyCode::D, // SteelSeries D-pad right
    KeyCode::BUTTON_L1,
    KeyCode::BUTTON_R1,
    KeyCode::BUTTON_START,
    KeyCode::BUTTON_SELECT,
];

/// Emulated keys, two per axis: `[axis * 2]` above the threshold,
/// `[axis * 2 + 1]` below its negation.
pub const ANALOG_KEYS: [KeyCode; 8] = [
    KeyCode::DPAD_RIGHT,
    KeyCode::DPAD_LEFT,
    KeyCode::DPAD_DOWN,
    KeyCode::DPAD_UP,
    KeyCode::KEY_6,
    KeyCode::KEY_4,
    KeyCode::KEY_5,
    KeyCode::KEY_8,
];

/// Key for a button index, or [`KeyCode::NONE`] if unmapped.
#[inline]
#[must_use]
pub fn button_key(index: u8) -> KeyCode {
    BUTTON_KEYS
        .get(index as usize)
        .copied()
        .unwrap_or(KeyCode::NONE)
}
