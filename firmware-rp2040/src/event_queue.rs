//! Event queue between the decoding and USB tasks.

use btpad::{EventSink, InputEvent};
use defmt::warn;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};

/// Events buffered while the USB task is busy.
pub const EVENT_QUEUE_DEPTH: usize = 32;

pub type EventChannel = Channel<CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>;

/// [`EventSink`] that pushes into an [`EventChannel`] without waiting.
///
/// Decoding must never block, so events that do not fit are dropped.
pub struct ChannelSink<'a> {
    sender: Sender<'a, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>,
    dropped: u32,
}

impl<'a> ChannelSink<'a> {
    #[must_use]
    pub fn new(sender: Sender<'a, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// Events lost to a full queue.
    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl EventSink for ChannelSink<'_> {
    fn emit(&mut self, event: InputEvent) {
        if self.sender.try_send(event).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("event queue full, dropped {:?}", event);
        }
    }
}
