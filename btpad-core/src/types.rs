//! Event types: KeyAction, ButtonEvent, AxisEvent, InputEvent.

use crate::keycode::{KeyCode, Modifiers};

/// Direction of a button transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    Down,
    Up,
}

impl KeyAction {
    /// `Down` for a pressed state, `Up` otherwise.
    #[inline]
    #[must_use]
    pub const fn from_pressed(pressed: bool) -> Self {
        if pressed {
            KeyAction::Down
        } else {
            KeyAction::Up
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, KeyAction::Down)
    }
}

/// A digital key transition.
///
/// Only ever emitted on an edge, never for a button that is merely still held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub action: KeyAction,
    pub key_code: KeyCode,
    pub modifiers: Modifiers,
    /// Set when the key was synthesized from an analog axis crossing a threshold.
    pub analog_emulated: bool,
}

impl ButtonEvent {
    #[must_use]
    pub const fn new(action: KeyAction, key_code: KeyCode) -> Self {
        Self {
            action,
            key_code,
            modifiers: Modifiers::NONE,
            analog_emulated: false,
        }
    }

    #[must_use]
    pub const fn down(key_code: KeyCode) -> Self {
        Self::new(KeyAction::Down, key_code)
    }

    #[must_use]
    pub const fn up(key_code: KeyCode) -> Self {
        Self::new(KeyAction::Up, key_code)
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the event as derived from an analog axis.
    #[must_use]
    pub const fn emulated(mut self) -> Self {
        self.analog_emulated = true;
        self
    }
}

/// An analog axis change, in the device's native range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisEvent {
    pub axis: u8,
    pub value: i16,
}

impl AxisEvent {
    #[must_use]
    pub const fn new(axis: u8, value: i16) -> Self {
        Self { axis, value }
    }
}

/// Anything a decoder can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    Button(ButtonEvent),
    Axis(AxisEvent),
}

impl InputEvent {
    /// The button event, if this is one.
    #[must_use]
    pub const fn as_button(&self) -> Option<&ButtonEvent> {
        match self {
            InputEvent::Button(b) => Some(b),
            InputEvent::Axis(_) => None,
        }
    }

    /// The axis event, if this is one.
    #[must_use]
    pub const fn as_axis(&self) -> Option<&AxisEvent> {
        match self {
            InputEvent::Axis(a) => Some(a),
            InputEvent::Button(_) => None,
        }
    }
}

impl From<ButtonEvent> for InputEvent {
    fn from(event: ButtonEvent) -> Self {
        InputEvent::Button(event)
    }
}

impl From<AxisEvent> for InputEvent {
    fn from(event: AxisEvent) -> Self {
        InputEvent::Axis(event)
    }
}
