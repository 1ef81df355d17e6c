//! USB HID gamepad presenting the decoded controller to the host.

use btpad::{PadState, PAD_AXES};
use defmt::Format;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{
    Config, HidBootProtocol, HidSubclass, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;

pub type UsbDriver<'d> = Driver<'d, USB>;

/// Wire form of [`PadState`].
///
/// Layout matches [`REPORT_DESCRIPTOR`]: 16 button bits (little-endian),
/// four signed stick bytes, two trigger bytes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Format)]
pub struct PadReport {
    pub buttons: u16,
    pub sticks: [i8; PAD_AXES],
    pub left_trigger: u8,
    pub right_trigger: u8,
}

impl PadReport {
    pub const SIZE: usize = 8;

    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let [lo, hi] = self.buttons.to_le_bytes();
        let [lx, ly, rx, ry] = self.sticks.map(|v| v as u8);
        [lo, hi, lx, ly, rx, ry, self.left_trigger, self.right_trigger]
    }
}

impl From<&PadState> for PadReport {
    fn from(state: &PadState) -> Self {
        Self {
            buttons: state.buttons.raw(),
            sticks: state.axes,
            left_trigger: state.left_trigger,
            right_trigger: state.right_trigger,
        }
    }
}

/// 16 buttons, two signed 8-bit sticks, two unsigned 8-bit triggers.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (16 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x10, //   Report Count (16)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Sticks ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x15, 0x81, //   Logical Minimum (-127)
    0x25, 0x7F, //   Logical Maximum (127)
    0x95, 0x04, //   Report Count (4)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Triggers ---
    0x09, 0x33, //   Usage (Rx)
    0x09, 0x34, //   Usage (Ry)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x95, 0x02, //   Report Count (2)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// HID writer that only reports when the pad changes.
pub struct UsbHidOutput<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, { PadReport::SIZE }>,
    last: Option<PadReport>,
}

impl<'d> UsbHidOutput<'d> {
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, { PadReport::SIZE }>) -> Self {
        Self { writer, last: None }
    }

    /// Wait until the host has configured the device.
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
    }

    /// Send `state`, skipping the write if the host already has it.
    pub async fn send(&mut self, state: &PadState) -> Result<(), EndpointError> {
        let report = PadReport::from(state);
        if self.last == Some(report) {
            return Ok(());
        }
        self.writer.write(&report.as_bytes()).await?;
        self.last = Some(report);
        Ok(())
    }
}

/// No output or feature reports; SET_REPORT is accepted and ignored.
pub struct PadRequestHandler;

impl RequestHandler for PadRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }
}

/// Register the gamepad interface with `builder`.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
    handler: &'d mut PadRequestHandler,
) -> HidWriter<'d, UsbDriver<'d>, { PadReport::SIZE }> {
    let config = Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(handler),
        poll_ms: 8,
        max_packet_size: PadReport::SIZE as u16,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
