//! Bluetooth HID controller decoding.
//!
//! HID devices deliver one report per interrupt channel packet, so unlike the
//! RFCOMM protocols there is no framing to recover: [`HidDecoder`] checks the
//! transaction header and the report length declared by the device, then hands
//! the payload to a [`HidDevice`] interpreter.
//!
//! | Driver | Device | Reports |
//! |--------|--------|---------|
//! | `hidkeyboard` | [`HidKeyboard`] | `0x01` keys (8), `0x02` media keys (3) |
//! | `hidgamepad` | [`HidGamepad`] | `0x00` buttons (5) |
//! | `ipega` | [`HidIpega`] | `0x07` sticks, D-pad, buttons (8) |
//! | `icade` | [`ICade`] | `0x01` keys (8), `0x02` ignored (3) |

#![cfg_attr(not(feature = "std"), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod gamepad;
pub mod icade;
pub mod ipega;
pub mod keyboard;
pub mod report;

pub use gamepad::HidGamepad;
pub use icade::ICade;
pub use ipega::HidIpega;
pub use keyboard::{parse_modifiers, usage_to_key, HidKeyboard};
pub use report::{expected_len, HidDecoder, HidDevice, HidReport, HID_INPUT_DATA};

pub type KeyboardDecoder = HidDecoder<HidKeyboard>;
pub type GamepadDecoder = HidDecoder<HidGamepad>;
pub type IpegaDecoder = HidDecoder<HidIpega>;
pub type ICadeDecoder = HidDecoder<ICade>;
