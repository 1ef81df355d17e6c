//! Driver selection.
//!
//! A connection is configured with a driver name; [`Decoder::from_driver_name`]
//! turns it into the matching decoder with fresh state. All decoders share the
//! [`ProtocolDecoder`] contract, so the accumulator and supervisor are written
//! once against [`Decoder`].

use core::fmt;

use bgp100_proto::{Bgp100Decoder, Variant};
use btpad_core::{EventSink, ProtocolDecoder};
use gamestop_proto::GameStopDecoder;
use hid_proto::{
    GamepadDecoder, HidDecoder, HidDevice, HidGamepad, HidIpega, HidKeyboard, ICade,
    ICadeDecoder, IpegaDecoder, KeyboardDecoder,
};
use zeemote_proto::ZeemoteDecoder;

use crate::dump::{self, DumpDecoder};

/// Every selectable driver name.
pub const DRIVER_NAMES: [&str; 10] = [
    zeemote_proto::DRIVER_NAME,
    Variant::Bgp100.driver_name(),
    Variant::Phonejoy.driver_name(),
    Variant::IControlPad.driver_name(),
    gamestop_proto::DRIVER_NAME,
    HidKeyboard::DRIVER_NAME,
    HidGamepad::DRIVER_NAME,
    HidIpega::DRIVER_NAME,
    ICade::DRIVER_NAME,
    dump::DRIVER_NAME,
];

/// Bluetooth channel a driver reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    /// Serial port profile stream; frames may span reads.
    Rfcomm,
    /// HID interrupt channel; one report per read.
    Hid,
}

impl Transport {
    /// Whether the decoder accepts arbitrarily chunked bytes.
    ///
    /// HID decoders need every read to deliver exactly one packet, so they
    /// cannot sit behind a plain serial link.
    #[must_use]
    pub const fn is_stream(self) -> bool {
        matches!(self, Transport::Rfcomm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// No driver is registered under the requested name.
    UnknownDriver,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::UnknownDriver => f.write_str("unknown driver"),
        }
    }
}

/// Decoder for any supported controller.
#[derive(Debug)]
pub enum Decoder {
    Zeemote(ZeemoteDecoder),
    /// BGP100, Phonejoy and iControlPad.
    Bgp100(Bgp100Decoder),
    GameStop(GameStopDecoder),
    HidKeyboard(KeyboardDecoder),
    HidGamepad(GamepadDecoder),
    Ipega(IpegaDecoder),
    ICade(ICadeDecoder),
    Dump(DumpDecoder),
}

impl Decoder {
    /// Create the decoder registered under `name`, ignoring ASCII case.
    pub fn from_driver_name(name: &str) -> Result<Self, DriverError> {
        let named = |candidate: &str| name.eq_ignore_ascii_case(candidate);

        let decoder = if named(zeemote_proto::DRIVER_NAME) {
            Decoder::Zeemote(ZeemoteDecoder::new())
        } else if let Some(variant) = [Variant::Bgp100, Variant::Phonejoy, Variant::IControlPad]
            .into_iter()
            .find(|v| named(v.driver_name()))
        {
            Decoder::Bgp100(Bgp100Decoder::new(variant))
        } else if named(gamestop_proto::DRIVER_NAME) {
            Decoder::GameStop(GameStopDecoder::new())
        } else if named(HidKeyboard::DRIVER_NAME) {
            Decoder::HidKeyboard(HidDecoder::new(HidKeyboard::new()))
        } else if named(HidGamepad::DRIVER_NAME) {
            Decoder::HidGamepad(HidDecoder::new(HidGamepad::new()))
        } else if named(HidIpega::DRIVER_NAME) {
            Decoder::Ipega(HidDecoder::new(HidIpega::new()))
        } else if named(ICade::DRIVER_NAME) {
            Decoder::ICade(HidDecoder::new(ICade))
        } else if named(dump::DRIVER_NAME) {
            Decoder::Dump(DumpDecoder::new())
        } else {
            warn!("no driver named {}", name);
            return Err(DriverError::UnknownDriver);
        };

        debug!("selected driver {}", decoder.driver_name());
        Ok(decoder)
    }

    /// Channel this decoder expects its bytes from.
    #[must_use]
    pub fn transport(&self) -> Transport {
        match self {
            Decoder::Zeemote(_) | Decoder::Bgp100(_) | Decoder::GameStop(_) | Decoder::Dump(_) => {
                Transport::Rfcomm
            }
            Decoder::HidKeyboard(_)
            | Decoder::HidGamepad(_)
            | Decoder::Ipega(_)
            | Decoder::ICade(_) => Transport::Hid,
        }
    }
}

impl ProtocolDecoder for Decoder {
    fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
        match self {
            Decoder::Zeemote(d) => d.parse(data, sink),
            Decoder::Bgp100(d) => d.parse(data, sink),
            Decoder::GameStop(d) => d.parse(data, sink),
            Decoder::HidKeyboard(d) => d.parse(data, sink),
            Decoder::HidGamepad(d) => d.parse(data, sink),
            Decoder::Ipega(d) => d.parse(data, sink),
            Decoder::ICade(d) => d.parse(data, sink),
            Decoder::Dump(d) => d.parse(data, sink),
        }
    }

    fn reset(&mut self) {
        match self {
            Decoder::Zeemote(d) => d.reset(),
            Decoder::Bgp100(d) => d.reset(),
            Decoder::GameStop(d) => d.reset(),
            Decoder::HidKeyboard(d) => d.reset(),
            Decoder::HidGamepad(d) => d.reset(),
            Decoder::Ipega(d) => d.reset(),
            Decoder::ICade(d) => d.reset(),
            Decoder::Dump(d) => d.reset(),
        }
    }

    fn driver_name(&self) -> &'static str {
        match self {
            Decoder::Zeemote(d) => d.driver_name(),
            Decoder::Bgp100(d) => d.driver_name(),
            Decoder::GameStop(d) => d.driver_name(),
            Decoder::HidKeyboard(d) => d.driver_name(),
            Decoder::HidGamepad(d) => d.driver_name(),
            Decoder::Ipega(d) => d.driver_name(),
            Decoder::ICade(d) => d.driver_name(),
            Decoder::Dump(d) => d.driver_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use btpad_core::{
        AxisEvent, ButtonEvent, ByteSource, ConnectionSupervisor, FrameAccumulator, InputEvent,
        KeyAction, KeyCode, ReadError,
    };
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use embedded_hal_async::delay::DelayNs;
    use std::collections::VecDeque;
    use std::vec::Vec;

    type Events = heapless::Vec<InputEvent, 64>;

    fn decoder(name: &str) -> Decoder {
        Decoder::from_driver_name(name).unwrap()
    }

    /// Hands out one queued chunk per read, then reports a disconnect.
    struct ChunkSource(VecDeque<Vec<u8>>);

    impl ChunkSource {
        fn new<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Self {
            Self(chunks.into_iter().map(<[u8]>::to_vec).collect())
        }

        /// One read per byte, the way a UART delivers them.
        fn bytewise(stream: &[u8]) -> Self {
            Self::new(stream.chunks(1))
        }
    }

    impl ByteSource for ChunkSource {
        fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, ReadError>> {
            let result = match self.0.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Err(ReadError::Disconnected),
            };
            core::future::ready(result)
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    // Every mock future is ready on first poll
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: f is not moved after pinning
        let f = unsafe { Pin::new_unchecked(&mut f) };
        match f.poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
        }
    }

    type Link = ConnectionSupervisor<ChunkSource, Decoder, Events, NoDelay>;

    /// Run `name` over `source` until every queued chunk has been read.
    fn run_link(name: &str, source: ChunkSource) -> Link {
        let reads = source.0.len();
        let mut link: Link = ConnectionSupervisor::new(source, decoder(name), Events::new(), NoDelay);
        for _ in 0..reads {
            block_on(link.poll_once()).unwrap();
        }
        link
    }

    /// Feed `stream` through an accumulator in the given chunk sizes.
    fn run_chunked(name: &str, stream: &[u8], splits: &[usize]) -> Events {
        let mut decoder = decoder(name);
        let mut acc: FrameAccumulator = FrameAccumulator::new();
        let mut events = Events::new();
        let mut start = 0;
        for end in splits.iter().copied().chain(core::iter::once(stream.len())) {
            acc.process(&stream[start..end], &mut decoder, &mut events);
            start = end;
        }
        events
    }

    #[test]
    fn test_every_name_resolves_to_itself() {
        for name in DRIVER_NAMES {
            let decoder = decoder(name);
            assert_eq!(decoder.driver_name(), name);
        }
    }

    #[test]
    fn test_names_case_insensitive() {
        assert_eq!(decoder("Zeemote").driver_name(), "zeemote");
        assert_eq!(decoder("ICONTROLPAD").driver_name(), "icontrolpad");
        assert_eq!(decoder("iCade").driver_name(), "icade");
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            Decoder::from_driver_name("wiimote").unwrap_err(),
            DriverError::UnknownDriver
        );
        assert!(Decoder::from_driver_name("").is_err());
    }

    #[test]
    fn test_transport() {
        assert_eq!(decoder("gamestop").transport(), Transport::Rfcomm);
        assert_eq!(decoder("phonejoy").transport(), Transport::Rfcomm);
        assert_eq!(decoder("ipega").transport(), Transport::Hid);
        assert_eq!(decoder("hidkeyboard").transport(), Transport::Hid);
    }

    #[test]
    fn test_names_unique() {
        for (i, a) in DRIVER_NAMES.iter().enumerate() {
            assert!(DRIVER_NAMES[i + 1..].iter().all(|b| !a.eq_ignore_ascii_case(b)));
        }
    }

    #[test]
    fn test_bgp100_edges_through_dispatch() {
        let events = run_chunked("bgp100", &[0xb0, 0x49, 0xf0, 0x09], &[1, 3]);
        assert_eq!(
            &events[..],
            &[
                InputEvent::Button(ButtonEvent::down(KeyCode::BUTTON_A)),
                InputEvent::Button(ButtonEvent::up(KeyCode::BUTTON_A)),
            ]
        );
    }

    #[test]
    fn test_zeemote_threshold_through_accumulator() {
        let mut stream = Vec::new();
        for x in [0u8, 100, 0] {
            stream.extend_from_slice(&[0x05, 0xa1, 0x08, 0x00, x, 0x00]);
        }
        let events = run_chunked("zeemote", &stream, &[4, 9, 13]);
        assert_eq!(
            &events[..],
            &[
                InputEvent::Axis(AxisEvent::new(0, 100)),
                InputEvent::Button(ButtonEvent::down(KeyCode::DPAD_RIGHT).emulated()),
                InputEvent::Axis(AxisEvent::new(0, 0)),
                InputEvent::Button(ButtonEvent::up(KeyCode::DPAD_RIGHT).emulated()),
            ]
        );
    }

    #[test]
    fn test_rfcomm_drivers_split_anywhere() {
        let streams: [(&str, Vec<u8>); 3] = [
            (
                "zeemote",
                [
                    &[0x04, 0xa1, 0x07, 0x00, 0x02][..],
                    &[0x05, 0xa1, 0x08, 0x00, 0x90, 0x10],
                    &[0x02, 0xa1, 0x07],
                ]
                .concat(),
            ),
            ("phonejoy", std::vec![0xb0, 0x49, 0x7f, 0xb2, 0x4e, 0xf0, 0x09, 0xf2, 0x0e]),
            (
                "gamestop",
                [
                    &[0xa1, 0xff, 0, 0, 0, 0, 0][..],
                    &[0xa1, 0x01, 0x80, 0xf0, 0x80, 0x80, 0x03, 0x01],
                    &[0xa1, 0x01, 0x80, 0x80, 0x80, 0x80, 0x01, 0x00],
                ]
                .concat(),
            ),
        ];

        for (name, stream) in &streams {
            let whole = run_chunked(name, stream, &[]);
            assert!(!whole.is_empty(), "{} produced no events", name);
            for split in 1..stream.len() {
                assert_eq!(
                    run_chunked(name, stream, &[split]),
                    whole,
                    "{} split at {}",
                    name,
                    split
                );
            }
            for a in 1..stream.len() {
                for b in a..stream.len() {
                    assert_eq!(run_chunked(name, stream, &[a, b]), whole);
                }
            }
        }
    }

    #[test]
    fn test_hid_packet_per_read() {
        let mut decoder = decoder("hidkeyboard");
        let mut acc: FrameAccumulator = FrameAccumulator::new();
        let mut events = Events::new();
        acc.process(&[0xa1, 0x01, 0, 0, 0x04, 0, 0, 0, 0, 0], &mut decoder, &mut events);
        assert!(acc.is_empty());
        acc.process(&[0xa1, 0x01, 0, 0, 0, 0, 0, 0, 0, 0], &mut decoder, &mut events);
        assert_eq!(
            &events[..],
            &[
                InputEvent::Button(ButtonEvent::new(KeyAction::Down, KeyCode::A)),
                InputEvent::Button(ButtonEvent::new(KeyAction::Up, KeyCode::A)),
            ]
        );
    }

    #[test]
    fn test_reset_through_dispatch() {
        let mut decoder = decoder("hidgamepad");
        let mut events = Events::new();
        decoder.parse(&[0xa1, 0x00, 0, 0, 0, 0x01, 0x00], &mut events);
        decoder.reset();
        decoder.parse(&[0xa1, 0x00, 0, 0, 0, 0x01, 0x00], &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_stream_transport_flag() {
        for name in DRIVER_NAMES {
            let transport = decoder(name).transport();
            assert_eq!(transport.is_stream(), transport == Transport::Rfcomm, "{}", name);
        }
        assert!(decoder("dump").transport().is_stream());
        assert!(!decoder("icade").transport().is_stream());
    }

    #[test]
    fn test_hid_decoder_needs_whole_packets() {
        let press_a = [0xa1, 0x01, 0, 0, 0x04, 0, 0, 0, 0, 0];

        let bytewise = run_link("hidkeyboard", ChunkSource::bytewise(&press_a));
        assert!(bytewise.sink().is_empty());

        let packets = run_link("hidkeyboard", ChunkSource::new([&press_a[..]]));
        assert_eq!(
            &packets.sink()[..],
            &[InputEvent::Button(ButtonEvent::down(KeyCode::A))]
        );
    }

    #[test]
    fn test_stream_decoder_bytewise_through_supervisor() {
        let stream = [0xb0, 0x49, 0xf0, 0x09];
        let link = run_link("bgp100", ChunkSource::bytewise(&stream));
        assert_eq!(
            &link.sink()[..],
            &[
                InputEvent::Button(ButtonEvent::down(KeyCode::BUTTON_A)),
                InputEvent::Button(ButtonEvent::up(KeyCode::BUTTON_A)),
            ]
        );
    }

    #[test]
    fn test_zeemote_recovers_after_desync() {
        // Header announcing a 128-byte frame that never completes.
        let mut stalled = std::vec![0x7f, 0xa1];
        stalled.resize(32, 0);
        let filler = [0u8; 38];
        let frame = [0x05, 0xa1, 0x08, 0x00, 100, 0x00];

        let mut link: Link = ConnectionSupervisor::new(
            ChunkSource::new([&stalled[..], &filler[..], &frame[..]]),
            decoder("zeemote"),
            Events::new(),
            NoDelay,
        );

        block_on(link.poll_once()).unwrap();
        assert_eq!(link.desync_count(), 0);

        block_on(link.poll_once()).unwrap();
        assert_eq!(link.desync_count(), 1);
        assert!(link.sink().is_empty());

        block_on(link.poll_once()).unwrap();
        assert_eq!(link.desync_count(), 1);
        assert_eq!(
            &link.sink()[..],
            &[
                InputEvent::Axis(AxisEvent::new(0, 100)),
                InputEvent::Button(ButtonEvent::down(KeyCode::DPAD_RIGHT).emulated()),
            ]
        );
    }
}
