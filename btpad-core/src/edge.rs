//! Edge detection over button bitmasks and analog axes.
//!
//! Decoders keep one of these per logical input group and only report
//! transitions, so a held button is reported once.

use crate::types::KeyAction;

/// Threshold used to derive digital keys from an analog nub (`127 / 2`).
pub const ANALOG_NUB_THRESHOLD: i16 = 127 / 2;

/// Stored state of up to 32 digital buttons.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEdges {
    last: u32,
}

impl ButtonEdges {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Store `current` and return the transitions relative to the previous mask.
    ///
    /// The new state is committed before the iterator is consumed, so the next
    /// frame always diffs against this one.
    pub fn update(&mut self, current: u32) -> Edges {
        let changed = self.last ^ current;
        self.last = current;
        Edges { changed, current }
    }

    /// Last stored mask.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.last
    }

    #[inline]
    #[must_use]
    pub const fn is_pressed(&self, bit: u8) -> bool {
        bit < 32 && self.last & (1 << bit) != 0
    }

    pub fn reset(&mut self) {
        self.last = 0;
    }
}

/// Iterator over changed bits, lowest bit first.
#[derive(Clone, Debug)]
pub struct Edges {
    changed: u32,
    current: u32,
}

impl Iterator for Edges {
    type Item = (u8, KeyAction);

    fn next(&mut self) -> Option<Self::Item> {
        if self.changed == 0 {
            return None;
        }
        let bit = self.changed.trailing_zeros();
        self.changed &= self.changed - 1;
        let pressed = self.current & (1 << bit) != 0;
        Some((bit as u8, KeyAction::from_pressed(pressed)))
    }
}

/// Comparison used to turn an axis value into a pair of digital keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Threshold {
    /// `value > t` is positive, `value < -t` is negative.
    Exclusive(i16),
    /// `value >= t` is positive, `value <= -t` is negative.
    Inclusive(i16),
}

impl Threshold {
    /// `(positive, negative)` for the given axis value.
    #[inline]
    #[must_use]
    pub const fn classify(self, value: i16) -> (bool, bool) {
        match self {
            Threshold::Exclusive(t) => (value > t, value < -t),
            Threshold::Inclusive(t) => (value >= t, value <= -t),
        }
    }
}

/// Stored state of one analog axis and its two emulated keys.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogAxis {
    value: i16,
    positive: bool,
    negative: bool,
}

impl AnalogAxis {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: 0,
            positive: false,
            negative: false,
        }
    }

    /// Store `value`, returning true if it differs from the previous one.
    #[inline]
    pub fn set_value(&mut self, value: i16) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Store the emulated key states, returning the transition of each.
    pub fn set_emulation(
        &mut self,
        positive: bool,
        negative: bool,
    ) -> (Option<KeyAction>, Option<KeyAction>) {
        let pos = (self.positive != positive).then(|| KeyAction::from_pressed(positive));
        let neg = (self.negative != negative).then(|| KeyAction::from_pressed(negative));
        self.positive = positive;
        self.negative = negative;
        (pos, neg)
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> i16 {
        self.value
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
