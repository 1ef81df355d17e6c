//! Bluetooth game controller decoding.
//!
//! Ties the protocol crates together behind one [`Decoder`] chosen by driver
//! name, and folds decoded events into a [`PadState`] for hosts that expose
//! the controller as a gamepad.
//!
//! | Driver | Transport | Crate |
//! |--------|-----------|-------|
//! | `zeemote` | RFCOMM | [`zeemote_proto`] |
//! | `bgp100`, `phonejoy`, `icontrolpad` | RFCOMM | [`bgp100_proto`] |
//! | `gamestop` | RFCOMM | [`gamestop_proto`] |
//! | `hidkeyboard`, `hidgamepad`, `ipega`, `icade` | HID | [`hid_proto`] |
//! | `dump` | RFCOMM | logs raw bytes |
//!
//! # Example
//!
//! ```
//! use btpad::{Decoder, FrameAccumulator, InputEvent};
//!
//! let mut decoder = Decoder::from_driver_name("bgp100").unwrap();
//! let mut acc: FrameAccumulator = FrameAccumulator::new();
//! let mut events: heapless::Vec<InputEvent, 8> = heapless::Vec::new();
//!
//! acc.process(&[0xb0], &mut decoder, &mut events);
//! acc.process(&[0x49], &mut decoder, &mut events);
//! assert_eq!(events.len(), 1);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through `defmt` (for embedded targets)
//! - **`log`**: Log through the `log` facade
//! - **`embedded-io`**: `embedded-io-async` reader adapter in [`btpad_core`]

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod driver;
pub mod dump;
pub mod pad;

pub use driver::{Decoder, DriverError, Transport, DRIVER_NAMES};
pub use dump::DumpDecoder;
pub use pad::{PadButtons, PadState, PAD_AXES};

// Re-export core types for convenience
pub use btpad_core::{
    AxisEvent, ButtonEvent, ByteSource, ConnectionState, ConnectionSupervisor, DecodeError,
    EventSink, FrameAccumulator, InputEvent, KeyAction, KeyCode, Modifiers, ProtocolDecoder,
    ReadError, SupervisorConfig, SupervisorError,
};

pub use bgp100_proto;
pub use btpad_core;
pub use gamestop_proto;
pub use hid_proto;
pub use zeemote_proto;
