//! Events driving the simulation.

use crate::station::Id;

/// What an event does when dispatched. Arrivals carry only a target
/// (exogenous origin), departures only a source, passages both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A customer arrives at `target` from outside the network.
    Arrival {
        /// Station receiving the customer.
        target: Id,
    },
    /// A customer finishes service at `source` and leaves the network.
    Departure {
        /// Station the customer leaves.
        source: Id,
    },
    /// A customer finishes service at `source` and immediately arrives at
    /// `target`, with no intermediate state observed.
    Passage {
        /// Station the customer leaves.
        source: Id,
        /// Station receiving the customer.
        target: Id,
    },
}

/// A state transition scheduled at a point in simulated time.
///
/// Events are ordered strictly by `time`; the kind and the station ids are
/// payload. Equal-time ordering is resolved by the scheduler (see
/// [`EventScheduler`](crate::EventScheduler)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Simulated time at which the event occurs.
    pub time: f64,
    /// The transition to perform.
    pub kind: EventKind,
}

impl Event {
    /// An exogenous arrival at `target`.
    pub fn arrival(time: f64, target: Id) -> Self {
        Self {
            time,
            kind: EventKind::Arrival { target },
        }
    }

    /// A service completion at `source` leaving the network.
    pub fn departure(time: f64, source: Id) -> Self {
        Self {
            time,
            kind: EventKind::Departure { source },
        }
    }

    /// A service completion at `source` routed to `target`.
    pub fn passage(time: f64, source: Id, target: Id) -> Self {
        Self {
            time,
            kind: EventKind::Passage { source, target },
        }
    }
}
