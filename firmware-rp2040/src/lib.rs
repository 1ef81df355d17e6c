//! Bluetooth controller to USB gamepad bridge for RP2040.
//!
//! A serial Bluetooth module carries the controller's RFCOMM stream to the
//! Pico over UART. The firmware decodes it with the driver chosen at build
//! time (`BTPAD_DRIVER`, default `zeemote`) and presents the result to the
//! host as a USB HID gamepad.
//!
//! Only stream drivers can be selected. HID drivers need one packet per
//! read, which a UART cannot deliver, so the link task refuses them.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | To Bluetooth module RX |
//! | UART1 RX | 9    | From Bluetooth module TX (9600 baud, 8N1) |
//! | LED      | 25   | On while no connection is up |
//!
//! # Architecture
//!
//! Three Embassy tasks:
//!
//! - **USB Task**: Runs the USB device stack
//! - **Link Task**: Runs a [`ConnectionSupervisor`](btpad::ConnectionSupervisor)
//!   over the UART, pushing events into an [`EventChannel`]
//! - **Output Task**: Folds events into a [`PadState`](btpad::PadState) and
//!   sends a report whenever it changes
//!
//! When the supervisor gives up, the pad is reset to neutral and the link
//! task calls [`reconnect`](btpad::ConnectionSupervisor::reconnect) after a
//! pause.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

pub mod event_queue;
pub mod uart_source;
pub mod usb_output;

pub use event_queue::{ChannelSink, EventChannel, EVENT_QUEUE_DEPTH};
pub use uart_source::{UartByteSource, MODULE_BAUDRATE};
pub use usb_output::{
    configure_usb_hid, PadReport, PadRequestHandler, UsbDriver, UsbHidOutput, REPORT_DESCRIPTOR,
};
