//! Time-ordered event queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::SimulationError;
use crate::event::Event;

#[derive(Debug, Clone)]
struct Scheduled {
    event: Event,
    seq: u64,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on (time, seq).
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A priority queue of pending [`Event`]s, ordered by time.
///
/// Ties on the timestamp are broken by a monotonically increasing sequence
/// number assigned at push, so equal-time events pop in FIFO order. This
/// secondary key is what makes runs reproducible regardless of how the
/// underlying heap resolves ties internally.
#[derive(Debug, Clone, Default)]
pub struct EventScheduler {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl EventScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pending event.
    pub fn push(&mut self, event: Event) {
        self.heap.push(Scheduled {
            event,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Removes and returns the event with the smallest time (FIFO among
    /// equal times), or [`SimulationError::EmptyScheduler`] if none is
    /// pending. The engine checks emptiness before popping; hitting this
    /// error elsewhere is a contract violation.
    pub fn pop(&mut self) -> Result<Event, SimulationError> {
        self.heap
            .pop()
            .map(|s| s.event)
            .ok_or(SimulationError::EmptyScheduler)
    }

    /// The next event to pop, if any.
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|s| &s.event)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
