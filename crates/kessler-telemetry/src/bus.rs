//! Bounded event buffer with pluggable sinks.
//!
//! `emit` only appends to an in-memory buffer, so the contact
//! pipeline's hot path never touches a sink; `flush` drains the buffer
//! into every registered sink between macro-steps. A full buffer drops
//! further events and counts them rather than ever stalling a solve.

use crate::events::ContactEvent;
use crate::sinks::EventSink;

/// Default buffer capacity. A macro-step emits a handful of events per
/// close pair, so this covers thousands of pairs between flushes.
const DEFAULT_CAPACITY: usize = 4096;

/// Event buffer for contact-engine telemetry.
pub struct EventBus {
    buffer: Vec<ContactEvent>,
    capacity: usize,
    dropped: u64,
    sinks: Vec<Box<dyn EventSink>>,
    enabled: bool,
}

impl EventBus {
    /// Creates a bus with the default buffer capacity and no sinks.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus that buffers at most `capacity` events between
    /// flushes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::new(),
            capacity,
            dropped: 0,
            sinks: Vec::new(),
            enabled: true,
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Enables or disables the bus. A disabled bus drops events
    /// silently, without counting them.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true if the bus is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Buffers an event. Does nothing when disabled; counts the event
    /// as dropped when the buffer is full.
    pub fn emit(&mut self, event: ContactEvent) {
        if !self.enabled {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.dropped += 1;
            return;
        }
        self.buffer.push(event);
    }

    /// Drains all buffered events into every registered sink.
    pub fn flush(&mut self) {
        for event in self.buffer.drain(..) {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
        }
    }

    /// Flushes and gives every sink its end-of-run callback.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    /// Events discarded because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
