//! Gamepad state built from decoded events.
//!
//! Hosts that present controllers as a single gamepad (for example a USB HID
//! device) fold the event stream into a [`PadState`] snapshot.

use core::ops::{BitOr, BitOrAssign};

use btpad_core::{ButtonEvent, InputEvent, KeyCode};

/// Gamepad buttons as a 16-bit field.
///
/// # Example
///
/// ```
/// use btpad::PadButtons;
///
/// let buttons = PadButtons::A | PadButtons::START;
/// assert!(buttons.contains(PadButtons::A));
/// assert!(!buttons.contains(PadButtons::B));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadButtons(pub u16);

impl PadButtons {
    pub const A: Self = Self(1 << 0);
    pub const B: Self = Self(1 << 1);
    pub const X: Self = Self(1 << 2);
    pub const Y: Self = Self(1 << 3);
    pub const LB: Self = Self(1 << 4);
    pub const RB: Self = Self(1 << 5);
    pub const BACK: Self = Self(1 << 6);
    pub const START: Self = Self(1 << 7);
    pub const GUIDE: Self = Self(1 << 8);
    pub const LS: Self = Self(1 << 9);
    pub const RS: Self = Self(1 << 10);
    pub const DPAD_UP: Self = Self(1 << 11);
    pub const DPAD_DOWN: Self = Self(1 << 12);
    pub const DPAD_LEFT: Self = Self(1 << 13);
    pub const DPAD_RIGHT: Self = Self(1 << 14);
    pub const C: Self = Self(1 << 15);

    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn contains(self, button: PadButtons) -> bool {
        (self.0 & button.0) == button.0
    }

    #[inline]
    pub fn set(&mut self, button: PadButtons, pressed: bool) {
        if pressed {
            self.0 |= button.0;
        } else {
            self.0 &= !button.0;
        }
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Pad button driven by `key`, if any.
    ///
    /// Numbered buttons map to their bit directly, so a generic HID gamepad
    /// keeps its own button order.
    #[must_use]
    pub const fn for_key(key: KeyCode) -> Option<Self> {
        let button = match key {
            KeyCode::BUTTON_A => Self::A,
            KeyCode::BUTTON_B => Self::B,
            KeyCode::BUTTON_X => Self::X,
            KeyCode::BUTTON_Y => Self::Y,
            KeyCode::BUTTON_L1 => Self::LB,
            KeyCode::BUTTON_R1 => Self::RB,
            KeyCode::BUTTON_SELECT => Self::BACK,
            KeyCode::BUTTON_START => Self::START,
            KeyCode::BUTTON_MODE => Self::GUIDE,
            KeyCode::BUTTON_THUMBL => Self::LS,
            KeyCode::BUTTON_THUMBR => Self::RS,
            KeyCode::DPAD_UP => Self::DPAD_UP,
            KeyCode::DPAD_DOWN => Self::DPAD_DOWN,
            KeyCode::DPAD_LEFT => Self::DPAD_LEFT,
            KeyCode::DPAD_RIGHT => Self::DPAD_RIGHT,
            KeyCode::BUTTON_C | KeyCode::BUTTON_Z => Self::C,
            KeyCode(code) if code >= KeyCode::BUTTON_1.0 && code <= KeyCode::BUTTON_16.0 => {
                Self(1 << (code - KeyCode::BUTTON_1.0))
            }
            _ => return None,
        };
        Some(button)
    }
}

impl BitOr for PadButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PadButtons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Number of analog axes tracked (two sticks).
pub const PAD_AXES: usize = 4;

/// Complete gamepad snapshot.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadState {
    pub buttons: PadButtons,
    /// Left X, left Y, right X, right Y.
    pub axes: [i8; PAD_AXES],
    pub left_trigger: u8,
    pub right_trigger: u8,
}

impl PadState {
    /// No buttons pressed, sticks centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: PadButtons::NONE,
            axes: [0; PAD_AXES],
            left_trigger: 0,
            right_trigger: 0,
        }
    }

    /// Fold one event into the snapshot, returning true if it changed.
    ///
    /// Emulated direction keys are skipped since the axis itself is
    /// reported; keys with no pad equivalent are ignored.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        let before = *self;
        match event {
            InputEvent::Button(button) => self.apply_button(button),
            InputEvent::Axis(axis) => {
                if let Some(slot) = self.axes.get_mut(axis.axis as usize) {
                    *slot = axis.value.clamp(-127, 127) as i8;
                }
            }
        }
        *self != before
    }

    fn apply_button(&mut self, event: &ButtonEvent) {
        if event.analog_emulated {
            return;
        }
        let pressed = event.action.is_down();
        match event.key_code {
            KeyCode::BUTTON_L2 => self.left_trigger = if pressed { u8::MAX } else { 0 },
            KeyCode::BUTTON_R2 => self.right_trigger = if pressed { u8::MAX } else { 0 },
            key => {
                if let Some(button) = PadButtons::for_key(key) {
                    self.buttons.set(button, pressed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btpad_core::AxisEvent;

    #[test]
    fn test_buttons_follow_edges() {
        let mut pad = PadState::neutral();
        assert!(pad.apply(&ButtonEvent::down(KeyCode::BUTTON_A).into()));
        assert!(pad.apply(&ButtonEvent::down(KeyCode::DPAD_LEFT).into()));
        assert_eq!(pad.buttons, PadButtons::A | PadButtons::DPAD_LEFT);

        assert!(!pad.apply(&ButtonEvent::down(KeyCode::BUTTON_A).into()));
        assert!(pad.apply(&ButtonEvent::up(KeyCode::BUTTON_A).into()));
        assert_eq!(pad.buttons, PadButtons::DPAD_LEFT);
    }

    #[test]
    fn test_numbered_buttons_map_to_bits() {
        assert_eq!(PadButtons::for_key(KeyCode::BUTTON_1), Some(PadButtons(1)));
        assert_eq!(PadButtons::for_key(KeyCode::BUTTON_16), Some(PadButtons(0x8000)));
        assert_eq!(PadButtons::for_key(KeyCode::A), None);
    }

    #[test]
    fn test_emulated_and_keyboard_keys_ignored() {
        let mut pad = PadState::neutral();
        assert!(!pad.apply(&ButtonEvent::down(KeyCode::DPAD_RIGHT).emulated().into()));
        assert!(!pad.apply(&ButtonEvent::down(KeyCode::KEY_6).into()));
        assert_eq!(pad, PadState::neutral());
    }

    #[test]
    fn test_axes_clamped() {
        let mut pad = PadState::neutral();
        assert!(pad.apply(&AxisEvent::new(0, -128).into()));
        assert!(pad.apply(&AxisEvent::new(3, 100).into()));
        assert!(!pad.apply(&AxisEvent::new(7, 100).into()));
        assert_eq!(pad.axes, [-127, 0, 0, 100]);
    }

    #[test]
    fn test_shoulder_triggers() {
        let mut pad = PadState::neutral();
        pad.apply(&ButtonEvent::down(KeyCode::BUTTON_R2).into());
        assert_eq!(pad.right_trigger, 255);
        pad.apply(&ButtonEvent::up(KeyCode::BUTTON_R2).into());
        assert_eq!(pad.right_trigger, 0);
    }
}
