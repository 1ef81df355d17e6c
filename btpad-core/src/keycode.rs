//! Key codes and meta-state flags carried by [`ButtonEvent`](crate::ButtonEvent).
//!
//! Values follow the Android `KeyEvent` numbering, since the consumer of these
//! events is an input-method framework that expects it.

use core::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// A host key code.
///
/// [`KeyCode::NONE`] marks an unmapped table slot; decoders never emit it.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const NONE: Self = Self(0);
    pub const HOME: Self = Self(3);

    pub const KEY_0: Self = Self(7);
    pub const KEY_1: Self = Self(8);
    pub const KEY_2: Self = Self(9);
    pub const KEY_3: Self = Self(10);
    pub const KEY_4: Self = Self(11);
    pub const KEY_5: Self = Self(12);
    pub const KEY_6: Self = Self(13);
    pub const KEY_7: Self = Self(14);
    pub const KEY_8: Self = Self(15);
    pub const KEY_9: Self = Self(16);

    pub const DPAD_UP: Self = Self(19);
    pub const DPAD_DOWN: Self = Self(20);
    pub const DPAD_LEFT: Self = Self(21);
    pub const DPAD_RIGHT: Self = Self(22);

    pub const VOLUME_UP: Self = Self(24);
    pub const VOLUME_DOWN: Self = Self(25);

    pub const A: Self = Self(29);
    pub const B: Self = Self(30);
    pub const C: Self = Self(31);
    pub const D: Self = Self(32);
    pub const E: Self = Self(33);
    pub const F: Self = Self(34);
    pub const G: Self = Self(35);
    pub const H: Self = Self(36);
    pub const I: Self = Self(37);
    pub const J: Self = Self(38);
    pub const K: Self = Self(39);
    pub const L: Self = Self(40);
    pub const M: Self = Self(41);
    pub const N: Self = Self(42);
    pub const O: Self = Self(43);
    pub const P: Self = Self(44);
    pub const Q: Self = Self(45);
    pub const R: Self = Self(46);
    pub const S: Self = Self(47);
    pub const T: Self = Self(48);
    pub const U: Self = Self(49);
    pub const V: Self = Self(50);
    pub const W: Self = Self(51);
    pub const X: Self = Self(52);
    pub const Y: Self = Self(53);
    pub const Z: Self = Self(54);

    pub const COMMA: Self = Self(55);
    pub const PERIOD: Self = Self(56);
    pub const ALT_LEFT: Self = Self(57);
    pub const ALT_RIGHT: Self = Self(58);
    pub const SHIFT_LEFT: Self = Self(59);
    pub const SHIFT_RIGHT: Self = Self(60);
    pub const TAB: Self = Self(61);
    pub const SPACE: Self = Self(62);
    pub const ENVELOPE: Self = Self(65);
    pub const ENTER: Self = Self(66);
    pub const DEL: Self = Self(67);
    pub const GRAVE: Self = Self(68);
    pub const MINUS: Self = Self(69);
    pub const EQUALS: Self = Self(70);
    pub const LEFT_BRACKET: Self = Self(71);
    pub const RIGHT_BRACKET: Self = Self(72);
    pub const BACKSLASH: Self = Self(73);
    pub const SEMICOLON: Self = Self(74);
    pub const APOSTROPHE: Self = Self(75);
    pub const SLASH: Self = Self(76);

    pub const MEDIA_PLAY_PAUSE: Self = Self(85);
    pub const MEDIA_STOP: Self = Self(86);
    pub const MEDIA_NEXT: Self = Self(87);
    pub const MEDIA_PREVIOUS: Self = Self(88);
    pub const MUTE: Self = Self(91);
    pub const PAGE_UP: Self = Self(92);
    pub const PAGE_DOWN: Self = Self(93);

    pub const BUTTON_A: Self = Self(96);
    pub const BUTTON_B: Self = Self(97);
    pub const BUTTON_C: Self = Self(98);
    pub const BUTTON_X: Self = Self(99);
    pub const BUTTON_Y: Self = Self(100);
    pub const BUTTON_Z: Self = Self(101);
    pub const BUTTON_L1: Self = Self(102);
    pub const BUTTON_R1: Self = Self(103);
    pub const BUTTON_L2: Self = Self(104);
    pub const BUTTON_R2: Self = Self(105);
    pub const BUTTON_THUMBL: Self = Self(106);
    pub const BUTTON_THUMBR: Self = Self(107);
    pub const BUTTON_START: Self = Self(108);
    pub const BUTTON_SELECT: Self = Self(109);
    pub const BUTTON_MODE: Self = Self(110);

    pub const ESCAPE: Self = Self(111);
    pub const CTRL_LEFT: Self = Self(113);
    pub const CTRL_RIGHT: Self = Self(114);
    pub const META_LEFT: Self = Self(117);
    pub const META_RIGHT: Self = Self(118);
    pub const MOVE_HOME: Self = Self(122);
    pub const MOVE_END: Self = Self(123);
    pub const INSERT: Self = Self(124);

    pub const F1: Self = Self(131);
    pub const F2: Self = Self(132);
    pub const F3: Self = Self(133);
    pub const F4: Self = Self(134);
    pub const F5: Self = Self(135);
    pub const F6: Self = Self(136);
    pub const F7: Self = Self(137);
    pub const F8: Self = Self(138);
    pub const F9: Self = Self(139);
    pub const F10: Self = Self(140);
    pub const F11: Self = Self(141);
    pub const F12: Self = Self(142);

    pub const BUTTON_1: Self = Self(188);
    pub const BUTTON_2: Self = Self(189);
    pub const BUTTON_3: Self = Self(190);
    pub const BUTTON_4: Self = Self(191);
    pub const BUTTON_5: Self = Self(192);
    pub const BUTTON_6: Self = Self(193);
    pub const BUTTON_7: Self = Self(194);
    pub const BUTTON_8: Self = Self(195);
    pub const BUTTON_9: Self = Self(196);
    pub const BUTTON_10: Self = Self(197);
    pub const BUTTON_11: Self = Self(198);
    pub const BUTTON_12: Self = Self(199);
    pub const BUTTON_13: Self = Self(200);
    pub const BUTTON_14: Self = Self(201);
    pub const BUTTON_15: Self = Self(202);
    pub const BUTTON_16: Self = Self(203);

    pub const LANGUAGE_SWITCH: Self = Self(204);

    /// Generic numbered gamepad button, `n` in `1..=16`.
    ///
    /// Returns [`KeyCode::NONE`] outside that range.
    #[inline]
    #[must_use]
    pub const fn button(n: u8) -> Self {
        if n >= 1 && n <= 16 {
            Self(Self::BUTTON_1.0 + n as u16 - 1)
        } else {
            Self::NONE
        }
    }

    /// Whether this slot carries a real key code.
    #[inline]
    #[must_use]
    pub const fn is_mapped(self) -> bool {
        self.0 != 0
    }

    /// Get the raw u16 value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Meta-state flags attached to key events.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Modifiers(pub u32);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT_ON: Self = Self(0x01);
    pub const ALT_ON: Self = Self(0x02);
    pub const ALT_LEFT_ON: Self = Self(0x10);
    pub const ALT_RIGHT_ON: Self = Self(0x20);
    pub const SHIFT_LEFT_ON: Self = Self(0x40);
    pub const SHIFT_RIGHT_ON: Self = Self(0x80);
    pub const CTRL_ON: Self = Self(0x1000);
    pub const CTRL_LEFT_ON: Self = Self(0x2000);
    pub const CTRL_RIGHT_ON: Self = Self(0x4000);
    pub const META_ON: Self = Self(0x10000);
    pub const META_LEFT_ON: Self = Self(0x20000);
    pub const META_RIGHT_ON: Self = Self(0x40000);

    /// Check if all of the given flags are set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if no flags are set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Modifiers {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Not for Modifiers {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}
