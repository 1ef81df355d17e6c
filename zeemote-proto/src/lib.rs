//! Zeemote / SteelSeries controller protocol decoding.
//!
//! This crate decodes the length-prefixed RFCOMM stream spoken by Zeemote
//! JS1 and SteelSeries Free controllers into edge-triggered button and axis
//! events. It is designed to be fed from any byte stream through
//! [`btpad_core::FrameAccumulator`].
//!
//! # Wire format
//!
//! ```text
//! [length][0xA1][type][payload; length - 2]
//! ```
//!
//! | Type | Payload |
//! |------|---------|
//! | `0x07` | indices of pressed buttons (original numbering) |
//! | `0x1c` | indices of pressed buttons (SteelSeries numbering) |
//! | `0x08` | stick index, signed X, signed Y |
//!
//! Each stick axis also drives two emulated direction keys once it passes
//! [`btpad_core::ANALOG_NUB_THRESHOLD`].
//!
//! # Example
//!
//! ```ignore
//! use zeemote_proto::ZeemoteDecoder;
//! use btpad_core::ProtocolDecoder;
//!
//! let mut decoder = ZeemoteDecoder::new();
//! let unparsed = decoder.parse(&[0x03, 0xA1, 0x07, 0x00], &mut events);
//! // events: Down(BUTTON_A)
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod mapping;
pub mod parser;

pub use mapping::{button_key, ANALOG_KEYS, BUTTON_KEYS};
pub use parser::{
    ZeemoteDecoder, BUTTON_UPDATE, BUTTON_UPDATE_STEELSERIES, DIRECTION_UPDATE, MAGIC,
    MAX_BUTTONS, MAX_STICKS,
};

/// Driver name used to select this decoder.
pub const DRIVER_NAME: &str = "zeemote";
