//! Error taxonomy of the simulation core.

use thiserror::Error;

use crate::station::Id;

/// Fatal conditions raised by the simulation core.
///
/// None of these are retried: a run either reaches
/// [`RunState::Terminated`](crate::RunState::Terminated) or the first error
/// aborts it. Statistics accrued before the failure remain readable for
/// diagnostics but do not constitute a completed run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A routing or event target does not match any configured station.
    #[error("unknown station id {0}")]
    UnknownStation(Id),

    /// A draw was requested past the configured bound of the random source.
    #[error("random source exhausted after {bound} draws")]
    RandomSourceExhausted {
        /// The configured maximum number of draws.
        bound: u64,
    },

    /// A pop was requested on an empty scheduler.
    #[error("event scheduler is empty")]
    EmptyScheduler,

    /// A station was constructed with a negative, non-sentinel capacity.
    #[error("invalid station capacity {0}")]
    InvalidCapacity(i64),

    /// Station parameters failed one of the bounds the core relies on.
    #[error("invalid station: {0}")]
    InvalidStation(String),
}
