//! Platform-agnostic building blocks for Bluetooth game controller decoders.
//!
//! This crate provides the pieces every controller protocol shares, without
//! any platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`types`]: Emitted events ([`ButtonEvent`], [`AxisEvent`], [`InputEvent`])
//! - [`keycode`]: Host key codes and meta-state flags ([`KeyCode`], [`Modifiers`])
//! - [`sink`]: Event sink trait ([`EventSink`])
//! - [`source`]: Byte stream trait ([`ByteSource`])
//! - [`accumulator`]: Leftover stitching between reads ([`FrameAccumulator`])
//! - [`edge`]: Edge detection ([`ButtonEdges`], [`AnalogAxis`])
//! - [`decoder`]: Decoder trait ([`ProtocolDecoder`])
//! - [`supervisor`]: Read loop and retry policy ([`ConnectionSupervisor`])
//!
//! # Data flow
//!
//! ```text
//! ByteSource --chunks--> FrameAccumulator --frames--> ProtocolDecoder --events--> EventSink
//!      ^
//!      +-- ConnectionSupervisor: retries with backoff, abandons after 10 failures
//! ```
//!
//! # Example
//!
//! ```rust
//! use btpad_core::{EventSink, FrameAccumulator, InputEvent, ProtocolDecoder};
//!
//! struct Echo;
//!
//! impl ProtocolDecoder for Echo {
//!     fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
//!         for &b in data {
//!             sink.axis(0, b as i16);
//!         }
//!         0
//!     }
//!     fn reset(&mut self) {}
//!     fn driver_name(&self) -> &'static str {
//!         "echo"
//!     }
//! }
//!
//! let mut acc: FrameAccumulator = FrameAccumulator::new();
//! let mut events: heapless::Vec<InputEvent, 4> = heapless::Vec::new();
//! acc.process(&[1, 2], &mut Echo, &mut events);
//! assert_eq!(events.len(), 2);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//! - **`log`**: Log through the `log` facade instead
//! - **`embedded-io`**: [`ByteSource`] adapter for `embedded-io-async` readers

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod accumulator;
pub mod decoder;
pub mod edge;
pub mod keycode;
pub mod sink;
pub mod source;
pub mod supervisor;
pub mod types;

// Re-export main types at crate root
pub use accumulator::{append_and_compact, FrameAccumulator, DEFAULT_BUFFER_CAPACITY, SAFETY_MARGIN};
pub use decoder::{DecodeError, ProtocolDecoder};
pub use edge::{AnalogAxis, ButtonEdges, Edges, Threshold, ANALOG_NUB_THRESHOLD};
pub use fmt::Hex;
pub use keycode::{KeyCode, Modifiers};
pub use sink::{EventSink, FnSink};
#[cfg(feature = "embedded-io")]
pub use source::IoSource;
pub use source::{ByteSource, ReadError};
pub use supervisor::{
    ConnectionState, ConnectionSupervisor, SupervisorConfig, SupervisorError,
    DEFAULT_SUPERVISOR_CONFIG,
};
pub use types::{AxisEvent, ButtonEvent, InputEvent, KeyAction};
