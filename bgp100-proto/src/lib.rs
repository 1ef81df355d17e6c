//! BGP100 / Phonejoy / iControlPad packed key code decoding.
//!
//! These controllers send every button transition as a 2-byte code over
//! RFCOMM. The first byte has its high bit set and the second does not, which
//! is how the decoder finds code boundaries again after a corrupted byte.
//!
//! ```text
//! 1xxx_????  0xxx_xxxx     (masked with 0xf0ff before lookup)
//! ```
//!
//! Press and release have distinct codes, so decoding is a plain table lookup
//! with no per-connection state.

#![cfg_attr(not(feature = "std"), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod mapping;
pub mod parser;

pub use mapping::{CodeMapping, Variant, BGP100_CODES, CODE_MASK, PHONEJOY_EXTRA_CODES};
pub use parser::{is_code_pair, packed_code, Bgp100Decoder, CODE_SIZE};
