//! HID interrupt channel packets and the device adapter.
//!
//! Every packet on the interrupt channel is one transaction:
//!
//! ```text
//! [transaction header][report id][payload...]
//! ```
//!
//! Only input data transactions (`0xA1`) carry device state. A device declares
//! which report ids it understands and how long each payload is; anything else
//! is logged and dropped before the device sees it.

use btpad_core::{DecodeError, EventSink, ProtocolDecoder};

/// Transaction header of an input data report.
pub const HID_INPUT_DATA: u8 = 0xA1;

/// Transaction header plus report id.
pub const HEADER_SIZE: usize = 2;

/// One demultiplexed interrupt channel packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidReport<'a> {
    pub hid_type: u8,
    pub report_id: u8,
    pub payload: &'a [u8],
}

impl<'a> HidReport<'a> {
    /// Split a packet into header, report id and payload.
    pub fn from_packet(packet: &'a [u8]) -> Result<Self, DecodeError> {
        match packet {
            [hid_type, report_id, payload @ ..] => {
                if *hid_type != HID_INPUT_DATA {
                    return Err(DecodeError::NotInputReport(*hid_type));
                }
                Ok(Self {
                    hid_type: *hid_type,
                    report_id: *report_id,
                    payload,
                })
            }
            _ => Err(DecodeError::Truncated),
        }
    }

    /// Check the payload against a device's report table.
    pub fn validate(&self, reports: &[(u8, usize)]) -> Result<(), DecodeError> {
        let expected = expected_len(reports, self.report_id)
            .ok_or(DecodeError::UnknownReportId(self.report_id))?;
        if self.payload.len() < expected {
            return Err(DecodeError::ShortReport {
                report_id: self.report_id,
                expected,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }
}

/// Declared payload length of `report_id`, if supported.
#[must_use]
pub fn expected_len(reports: &[(u8, usize)], report_id: u8) -> Option<usize> {
    reports
        .iter()
        .find(|(id, _)| *id == report_id)
        .map(|&(_, len)| len)
}

/// A HID device interpreter.
///
/// `handle_report` is only called with a report id listed in
/// `SUPPORTED_REPORTS` and a payload at least as long as declared there.
pub trait HidDevice {
    /// Driver name used to select this device.
    const DRIVER_NAME: &'static str;

    /// `(report id, payload length)` pairs this device understands.
    const SUPPORTED_REPORTS: &'static [(u8, usize)];

    fn handle_report<S: EventSink + ?Sized>(&mut self, report_id: u8, payload: &[u8], sink: &mut S);

    fn reset(&mut self);
}

/// Adapts a [`HidDevice`] to [`ProtocolDecoder`].
///
/// HID transports deliver whole packets, so each `parse` call is one packet
/// and nothing is ever left over.
#[derive(Debug, Default)]
pub struct HidDecoder<D> {
    device: D,
}

impl<D: HidDevice> HidDecoder<D> {
    #[must_use]
    pub const fn new(device: D) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    fn decode<S: EventSink + ?Sized>(&mut self, packet: &[u8], sink: &mut S) -> Result<(), DecodeError> {
        let report = HidReport::from_packet(packet)?;
        report.validate(D::SUPPORTED_REPORTS)?;
        self.device.handle_report(report.report_id, report.payload, sink);
        Ok(())
    }
}

impl<D: HidDevice> ProtocolDecoder for HidDecoder<D> {
    fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
        if data.is_empty() {
            return 0;
        }
        if let Err(e) = self.decode(data, sink) {
            warn!("{}: dropped report: {}", D::DRIVER_NAME, e);
        }
        0
    }

    fn reset(&mut self) {
        self.device.reset();
    }

    fn driver_name(&self) -> &'static str {
        D::DRIVER_NAME
    }
}
