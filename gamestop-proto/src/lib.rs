//! GameStop controller protocol decoding.
//!
//! The GameStop controller streams fixed-length frames over RFCOMM:
//!
//! | Subtype | Length | Content |
//! |---------|--------|---------|
//! | `0xfe` | 18 | connection header, ignored |
//! | `0xff` | 7 | battery status, ignored |
//! | `0x01` | 8 | four axes (offset by `0x80`) and a 16-bit button mask |
//!
//! ```text
//! [0xA1][0x01][ax0][ax1][ax2][ax3][buttons hi][buttons lo]
//! ```
//!
//! An unknown subtype makes the rest of the buffer unparseable, since its
//! length cannot be known; the decoder drops it and resynchronises on the
//! next read.

#![cfg_attr(not(feature = "std"), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod parser;

pub use parser::{
    FrameKind, GameStopDecoder, Report, ANALOG_KEYS, BUTTON_KEYS, MAGIC, MESSAGE_LENGTH,
    SUPPORTED_BUTTONS,
};

/// Driver name used to select this decoder.
pub const DRIVER_NAME: &str = "gamestop";
