//! Bounded source of uniform random draws in `[0, 1)`.
//!
//! Every simulation consumes a strictly bounded supply of randomness: the
//! source either generates draws with a linear congruential generator or
//! replays a literal sequence of pre-computed values. Both backends share the
//! same draw-counting contract, so the engine never knows which one is active.
//! Exhausting the supply is the usual way a run ends.

use crate::error::SimulationError;

const LCG_A: u64 = 1664525;
const LCG_C: u64 = 1013904223;
const LCG_M: u64 = 1 << 32;

#[derive(Debug, Clone)]
enum Backend {
    Lcg { state: u64 },
    Literal { values: Vec<f64> },
}

/// A bounded generator of uniform draws in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct RandomSource {
    backend: Backend,
    drawn: u64,
    bound: u64,
}

impl RandomSource {
    /// Creates a reproducible pseudo-random stream seeded with `seed`,
    /// limited to `max_draws` draws.
    ///
    /// The stream is the classic linear congruential generator
    /// `X_{n+1} = (1664525 * X_n + 1013904223) mod 2^32`, with each draw
    /// returned as `X_{n+1} / 2^32`.
    pub fn lcg(seed: u64, max_draws: u64) -> Self {
        Self {
            backend: Backend::Lcg { state: seed % LCG_M },
            drawn: 0,
            bound: max_draws,
        }
    }

    /// Creates a source replaying `values` in order; its bound is the
    /// sequence length. Used for deterministic tests and exact scenario
    /// reproduction.
    pub fn literal(values: Vec<f64>) -> Self {
        let bound = values.len() as u64;
        Self {
            backend: Backend::Literal { values },
            drawn: 0,
            bound,
        }
    }

    /// Returns the next draw, or [`SimulationError::RandomSourceExhausted`]
    /// once `bound` draws have been taken.
    pub fn next(&mut self) -> Result<f64, SimulationError> {
        if !self.has_more() {
            return Err(SimulationError::RandomSourceExhausted { bound: self.bound });
        }
        let value = match &mut self.backend {
            Backend::Lcg { state } => {
                *state = (LCG_A * *state + LCG_C) % LCG_M;
                *state as f64 / LCG_M as f64
            }
            Backend::Literal { values } => values[self.drawn as usize],
        };
        self.drawn += 1;
        Ok(value)
    }

    /// Whether at least one more draw will succeed.
    pub fn has_more(&self) -> bool {
        self.drawn < self.bound
    }

    /// Number of draws taken so far.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Maximum number of draws that will ever succeed.
    pub fn bound(&self) -> u64 {
        self.bound
    }
}
