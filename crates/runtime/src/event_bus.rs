use foundation::time::Timestamp;

/// An emitted event, stamped with the host time of the input that caused it.
///
/// `seq` is assigned by the bus and strictly increases across drains, so a
/// host that buffers events from several drains can still order them.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub seq: u64,
    pub at: Timestamp,
    pub kind: E,
}

/// Outbound event queue, drained by the host after each input callback.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, at: Timestamp, kind: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event { seq, at, kind });
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}
