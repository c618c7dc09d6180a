//! Model loading.
//!
//! A model file is a JSON document naming the queues, the routing network,
//! the seeded arrivals and the random mode:
//!
//! ```json
//! {
//!     "arrivals": { "Q1": 2.0 },
//!     "queues": {
//!         "Q1": { "servers": 1, "capacity": 5, "minArrival": 2.0, "maxArrival": 4.0,
//!                 "minService": 3.0, "maxService": 5.0 },
//!         "Q2": { "servers": 2, "minService": 1.0, "maxService": 2.0 }
//!     },
//!     "network": [
//!         { "source": "Q1", "target": "Q2", "probability": 0.8 }
//!     ],
//!     "seed": 42,
//!     "rndnumbersPerSeed": 100000
//! }
//! ```
//!
//! Omitting `capacity` means unbounded (sentinel `-1`); omitting the arrival
//! bounds means the queue is fed only through routing; an edge without a
//! `target` routes out of the network. Instead of `seed` and
//! `rndnumbersPerSeed`, a literal draw sequence can be given as
//! `rndnumbers` for exact scenario replay.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::error::SimulationError;
use crate::random::RandomSource;
use crate::simulation::Simulation;
use crate::station::{Capacity, Id, StationParams};

/// Errors produced while loading a model.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The model file could not be read.
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    /// The model document is not valid JSON or misses required fields.
    #[error("malformed model: {0}")]
    Parse(#[from] serde_json::Error),

    /// An edge or arrival references a queue the model does not declare.
    #[error("unknown queue '{0}'")]
    UnknownQueue(String),

    /// The model is well-formed but semantically invalid.
    #[error("invalid model: {0}")]
    Invalid(String),

    /// A core-level validation failure surfaced during construction.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Parameters of one queue as written in the model file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueueConfig {
    /// Number of servers.
    pub servers: u32,
    /// Capacity; `-1` (the default) means unbounded.
    #[serde(default = "unbounded")]
    pub capacity: i64,
    /// Minimum exogenous inter-arrival time.
    pub min_arrival: Option<f64>,
    /// Maximum exogenous inter-arrival time.
    pub max_arrival: Option<f64>,
    /// Minimum service time.
    pub min_service: f64,
    /// Maximum service time.
    pub max_service: f64,
}

fn unbounded() -> i64 {
    -1
}

/// One routing edge as written in the model file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeConfig {
    /// Queue the edge leaves.
    pub source: String,
    /// Queue the edge enters; absent means the customer exits the network.
    pub target: Option<String>,
    /// Probability of taking this edge.
    pub probability: f64,
}

/// A parsed model document.
///
/// Queues and arrivals are keyed by name; `BTreeMap` keeps their
/// construction order stable so identical models always produce identical
/// station ids and event ordering.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// First exogenous arrival time per queue; seeds the scheduler.
    #[serde(default)]
    pub arrivals: BTreeMap<String, f64>,
    /// Queue declarations.
    #[serde(default)]
    pub queues: BTreeMap<String, QueueConfig>,
    /// Routing edges, in file order.
    #[serde(default)]
    pub network: Vec<EdgeConfig>,
    /// Seed of the pseudo-random stream.
    pub seed: Option<u64>,
    /// Draw bound of the pseudo-random stream.
    #[serde(rename = "rndnumbersPerSeed")]
    pub max_draws: Option<u64>,
    /// Literal draw sequence, mutually exclusive with `seed`.
    #[serde(rename = "rndnumbers")]
    pub draws: Option<Vec<f64>>,
}

impl Config {
    /// Parses a model from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a model file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Builds a ready-to-run [`Simulation`] from the model.
    pub fn build(&self) -> Result<Simulation, ConfigError> {
        let mut sim = Simulation::new(self.random_source()?);
        let mut ids: FxHashMap<&str, Id> = FxHashMap::default();
        for (name, queue) in &self.queues {
            let id = sim.add_station(StationParams {
                name: name.clone(),
                servers: queue.servers,
                capacity: Capacity::from_raw(queue.capacity)?,
                arrival: queue.arrival_bounds(name)?,
                service: (queue.min_service, queue.max_service),
            })?;
            ids.insert(name.as_str(), id);
        }
        for edge in &self.network {
            let source = Self::resolve(&ids, &edge.source)?;
            let target = match &edge.target {
                Some(name) => Some(Self::resolve(&ids, name)?),
                None => None,
            };
            sim.add_route(source, target, edge.probability)?;
        }
        for (name, time) in &self.arrivals {
            let id = Self::resolve(&ids, name)?;
            sim.schedule_arrival(id, *time);
        }
        info!(
            "model loaded: {} queues, {} edges, {} seeded arrivals",
            self.queues.len(),
            self.network.len(),
            self.arrivals.len()
        );
        Ok(sim)
    }

    fn random_source(&self) -> Result<RandomSource, ConfigError> {
        match (self.seed, &self.draws) {
            (Some(seed), None) => {
                let bound = self.max_draws.ok_or_else(|| {
                    ConfigError::Invalid("seed requires rndnumbersPerSeed".into())
                })?;
                Ok(RandomSource::lcg(seed, bound))
            }
            (None, Some(draws)) => Ok(RandomSource::literal(draws.clone())),
            (Some(_), Some(_)) => Err(ConfigError::Invalid(
                "seed and rndnumbers are mutually exclusive".into(),
            )),
            (None, None) => Err(ConfigError::Invalid(
                "either seed or rndnumbers is required".into(),
            )),
        }
    }

    fn resolve(ids: &FxHashMap<&str, Id>, name: &str) -> Result<Id, ConfigError> {
        ids.get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownQueue(name.to_owned()))
    }
}

impl QueueConfig {
    fn arrival_bounds(&self, name: &str) -> Result<Option<(f64, f64)>, ConfigError> {
        match (self.min_arrival, self.max_arrival) {
            (Some(min), Some(max)) => Ok(Some((min, max))),
            (None, None) => Ok(None),
            _ => Err(ConfigError::Invalid(format!(
                "queue '{name}': minArrival and maxArrival must be given together"
            ))),
        }
    }
}
