//! Event sink trait and its stock implementations.

use crate::types::{AxisEvent, ButtonEvent, InputEvent};

/// Receives decoded events, in the order the bytes implying them were parsed.
///
/// Emission is fire-and-forget: a sink that cannot keep up drops events
/// rather than pushing back into the decoder.
pub trait EventSink {
    fn emit(&mut self, event: InputEvent);

    #[inline]
    fn button(&mut self, event: ButtonEvent) {
        self.emit(InputEvent::Button(event));
    }

    #[inline]
    fn axis(&mut self, axis: u8, value: i16) {
        self.emit(InputEvent::Axis(AxisEvent::new(axis, value)));
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn emit(&mut self, event: InputEvent) {
        (**self).emit(event);
    }
}

impl<const N: usize> EventSink for heapless::Vec<InputEvent, N> {
    fn emit(&mut self, event: InputEvent) {
        if self.push(event).is_err() {
            warn!("event queue full, dropping {:?}", event);
        }
    }
}

impl<const N: usize> EventSink for heapless::Deque<InputEvent, N> {
    fn emit(&mut self, event: InputEvent) {
        if self.push_back(event).is_err() {
            warn!("event queue full, dropping {:?}", event);
        }
    }
}

#[cfg(feature = "std")]
impl EventSink for std::vec::Vec<InputEvent> {
    #[inline]
    fn emit(&mut self, event: InputEvent) {
        self.push(event);
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F: FnMut(InputEvent)> EventSink for FnSink<F> {
    #[inline]
    fn emit(&mut self, event: InputEvent) {
        (self.0)(event);
    }
}
