//! Leftover stitching between reads.
//!
//! A read may end in the middle of a frame. The accumulator keeps the bytes a
//! decoder did not consume and places them in front of the next read, so no
//! frame is parsed twice or skipped because of where a read boundary fell.
//!
//! The retained tail is bounded: once it would reach `N - SAFETY_MARGIN`
//! bytes the stream is considered out of sync and the buffer is dropped.

use heapless::Vec;

use crate::decoder::ProtocolDecoder;
use crate::sink::EventSink;

/// Per-connection buffer size.
pub const DEFAULT_BUFFER_CAPACITY: usize = 80;

/// Room always left free for a fresh read.
pub const SAFETY_MARGIN: usize = 10;

/// Concatenate `leftover` and `incoming` into a fresh buffer.
///
/// Bytes that do not fit in `N` are dropped from the end.
#[must_use]
pub fn append_and_compact<const N: usize>(leftover: &[u8], incoming: &[u8]) -> Vec<u8, N> {
    let mut buffer = Vec::new();
    for &byte in leftover.iter().chain(incoming) {
        if buffer.push(byte).is_err() {
            warn!(
                "frame buffer full, dropped {} bytes",
                leftover.len() + incoming.len() - N
            );
            break;
        }
    }
    buffer
}

/// Fixed-capacity frame buffer for one connection.
pub struct FrameAccumulator<const N: usize = DEFAULT_BUFFER_CAPACITY> {
    buffer: [u8; N],
    len: usize,
    desyncs: u32,
}

impl<const N: usize> FrameAccumulator<N> {
    /// Retained-tail size at which the buffer is discarded.
    pub const WATERMARK: usize = N.saturating_sub(SAFETY_MARGIN);

    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
            desyncs: 0,
        }
    }

    /// Bytes currently buffered.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// How many times the buffer was dropped for exceeding the watermark.
    #[inline]
    #[must_use]
    pub const fn desync_count(&self) -> u32 {
        self.desyncs
    }

    /// Writable space after the buffered bytes, for reading in place.
    #[inline]
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.len..]
    }

    /// Mark `count` bytes written into [`spare_mut`](Self::spare_mut) as buffered.
    #[inline]
    pub fn commit(&mut self, count: usize) {
        self.len = (self.len + count).min(N);
    }

    /// Copy as much of `chunk` as fits, returning the number of bytes taken.
    pub fn feed(&mut self, chunk: &[u8]) -> usize {
        let spare = self.spare_mut();
        let count = spare.len().min(chunk.len());
        spare[..count].copy_from_slice(&chunk[..count]);
        self.len += count;
        count
    }

    /// Run one parse pass over the buffered bytes and keep the unparsed tail.
    ///
    /// Returns the number of bytes retained.
    pub fn decode<D, S>(&mut self, decoder: &mut D, sink: &mut S) -> usize
    where
        D: ProtocolDecoder + ?Sized,
        S: EventSink + ?Sized,
    {
        if self.len == 0 {
            return 0;
        }
        let unparsed = decoder.parse(&self.buffer[..self.len], sink);
        self.retain_tail(unparsed);
        self.len
    }

    /// Feed an arbitrarily long chunk, decoding whenever the buffer fills.
    pub fn process<D, S>(&mut self, mut chunk: &[u8], decoder: &mut D, sink: &mut S)
    where
        D: ProtocolDecoder + ?Sized,
        S: EventSink + ?Sized,
    {
        loop {
            let taken = self.feed(chunk);
            chunk = &chunk[taken..];
            self.decode(decoder, sink);
            if chunk.is_empty() {
                break;
            }
        }
    }

    /// Keep the last `unparsed` bytes, moved to the front of the buffer.
    pub fn retain_tail(&mut self, unparsed: usize) {
        let unparsed = unparsed.min(self.len);
        if unparsed > 0 && unparsed >= Self::WATERMARK {
            warn!(
                "protocol desync, discarding {} buffered bytes",
                unparsed
            );
            self.desyncs = self.desyncs.saturating_add(1);
            self.len = 0;
            return;
        }
        let start = self.len - unparsed;
        self.buffer.copy_within(start..self.len, 0);
        self.len = unparsed;
    }

    /// Drop all buffered bytes.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const N: usize> Default for FrameAccumulator<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::keycode::KeyCode;
    use crate::types::{ButtonEvent, InputEvent};
    use std::vec::Vec as StdVec;

    /// `[0xAA, code]` pairs, everything else skipped byte by byte.
    struct PairDecoder;

    impl ProtocolDecoder for PairDecoder {
        fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
            let mut offset = 0;
            while data.len() - offset >= 2 {
                if data[offset] == 0xAA {
                    sink.button(ButtonEvent::down(KeyCode(data[offset + 1] as u16)));
                    offset += 2;
                } else {
                    offset += 1;
                }
            }
            if data.len() - offset == 1 && data[offset] != 0xAA {
                return 0;
            }
            data.len() - offset
        }

        fn reset(&mut self) {}

        fn driver_name(&self) -> &'static str {
            "pairs"
        }
    }

    /// Never consumes anything.
    struct StuckDecoder;

    impl ProtocolDecoder for StuckDecoder {
        fn parse<S: EventSink + ?Sized>(&mut self, data: &[u8], _sink: &mut S) -> usize {
            data.len()
        }

        fn reset(&mut self) {}

        fn driver_name(&self) -> &'static str {
            "stuck"
        }
    }

    fn codes(events: &[InputEvent]) -> StdVec<u16> {
        events
            .iter()
            .filter_map(|e| e.as_button().map(|b| b.key_code.raw()))
            .collect()
    }

    #[test]
    fn test_append_and_compact_concatenates() {
        let buf: Vec<u8, 8> = append_and_compact(&[1, 2], &[3, 4, 5]);
        assert_eq!(&buf[..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_append_and_compact_truncates() {
        let buf: Vec<u8, 4> = append_and_compact(&[1, 2, 3], &[4, 5]);
        assert_eq!(&buf[..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_partial_frame_retained_at_front() {
        let mut acc: FrameAccumulator = FrameAccumulator::new();
        let mut sink: heapless::Vec<InputEvent, 8> = heapless::Vec::new();

        acc.feed(&[0xAA, 0x01, 0xAA]);
        assert_eq!(acc.decode(&mut PairDecoder, &mut sink), 1);
        assert_eq!(acc.pending(), &[0xAA]);

        acc.feed(&[0x02]);
        assert_eq!(acc.decode(&mut PairDecoder, &mut sink), 0);
        assert_eq!(codes(&sink), [1, 2]);
    }

    #[test]
    fn test_split_at_every_boundary() {
        let stream = [0xAA, 0x01, 0x55, 0xAA, 0x02, 0xAA, 0x03, 0x00, 0xAA, 0x04];

        let mut whole: heapless::Vec<InputEvent, 16> = heapless::Vec::new();
        let mut acc: FrameAccumulator = FrameAccumulator::new();
        acc.process(&stream, &mut PairDecoder, &mut whole);

        for split in 1..stream.len() {
            let mut acc: FrameAccumulator = FrameAccumulator::new();
            let mut sink: heapless::Vec<InputEvent, 16> = heapless::Vec::new();
            acc.process(&stream[..split], &mut PairDecoder, &mut sink);
            acc.process(&stream[split..], &mut PairDecoder, &mut sink);
            assert_eq!(sink, whole, "split at {}", split);
        }
        assert_eq!(codes(&whole), [1, 2, 3, 4]);
    }

    #[test]
    fn test_watermark_discard() {
        let mut acc: FrameAccumulator<20> = FrameAccumulator::new();
        let mut sink: heapless::Vec<InputEvent, 8> = heapless::Vec::new();
        assert_eq!(FrameAccumulator::<20>::WATERMARK, 10);

        acc.feed(&[0x11; 9]);
        assert_eq!(acc.decode(&mut StuckDecoder, &mut sink), 9);
        assert_eq!(acc.desync_count(), 0);

        acc.feed(&[0x11]);
        assert_eq!(acc.decode(&mut StuckDecoder, &mut sink), 0);
        assert_eq!(acc.desync_count(), 1);
        assert!(acc.is_empty());

        acc.feed(&[0xAA, 0x07]);
        acc.decode(&mut PairDecoder, &mut sink);
        assert_eq!(codes(&sink), [7]);
    }

    #[test]
    fn test_read_in_place() {
        let mut acc: FrameAccumulator<16> = FrameAccumulator::new();
        let spare = acc.spare_mut();
        assert_eq!(spare.len(), 16);
        spare[..2].copy_from_slice(&[0xAA, 0x09]);
        acc.commit(2);
        assert_eq!(acc.pending(), &[0xAA, 0x09]);
    }

    #[test]
    fn test_process_larger_than_capacity() {
        let mut acc: FrameAccumulator<16> = FrameAccumulator::new();
        let mut sink: heapless::Vec<InputEvent, 32> = heapless::Vec::new();
        let mut stream = [0u8; 40];
        for (i, pair) in stream.chunks_mut(2).enumerate() {
            pair[0] = 0xAA;
            pair[1] = i as u8;
        }
        acc.process(&stream, &mut PairDecoder, &mut sink);
        assert_eq!(sink.len(), 20);
    }
}
