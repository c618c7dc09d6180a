//! Queuenet is a discrete-event simulator for open networks of queueing stations. A model is a set
//! of G/G/c nodes with optional finite capacity, uniform service (and optionally arrival) time
//! intervals, and probabilistic routing between them; running it produces time-weighted occupancy
//! statistics and loss counts over a finite simulated horizon.
//!
//! ## Basic Concepts
//!
//! **Station.** One queueing node: a pool of servers, an optional bound on total occupancy, and a
//! routing table deciding where customers go after service. Stations with configured inter-arrival
//! bounds additionally feed themselves with an exogenous arrival stream.
//!
//! **Event.** A state transition scheduled at a point in simulated time: an *arrival* from outside
//! the network, a *departure* out of the network, or a *passage* moving a customer from one
//! station to another in a single step. Events live in a time-ordered scheduler; ties on the
//! timestamp are broken FIFO by insertion order, which keeps runs reproducible.
//!
//! **Randomness.** Every run consumes a strictly bounded supply of uniform draws in `[0, 1)`,
//! produced either by a seeded linear congruential generator or by replaying a literal sequence of
//! values. Exhausting the supply ends the run even if events are still pending; this asymmetric
//! termination rule is deliberate and matches the bounded-experiment semantics of the model.
//! Identical configuration and identical random mode produce bit-identical results.
//!
//! **Simulation.** The engine owns the global clock, the stations, the scheduler and the random
//! source. Each iteration pops the earliest event, charges the elapsed interval to every station's
//! current occupancy level, dispatches the event, and pushes whatever follow-up events it
//! produces. Nothing is shared or concurrent: independent simulations compose freely in one
//! process.
//!
//! ## Example
//!
//! A single G/G/1 station with room for two customers, deterministic service and arrival times,
//! and a literal draw sequence for exact replay:
//!
//! ```rust
//! use queuenet::{Capacity, RandomSource, RunState, Simulation, StationParams};
//!
//! let mut sim = Simulation::new(RandomSource::literal(vec![0.5; 5]));
//! let a = sim
//!     .add_station(StationParams {
//!         name: "A".into(),
//!         servers: 1,
//!         capacity: Capacity::Finite(2),
//!         arrival: Some((2.0, 2.0)),
//!         service: (1.0, 1.0),
//!     })
//!     .unwrap();
//! sim.schedule_arrival(a, 0.0);
//! sim.run().unwrap();
//!
//! let report = sim.report();
//! assert_eq!(sim.run_state(), RunState::Terminated);
//! assert_eq!(report.total_time, 4.0);
//! assert_eq!(report.stations[0].losses, 0);
//! // Service always finishes before the next arrival, so the station
//! // alternates between empty and a single customer in service.
//! assert_eq!(report.stations[0].histogram, vec![2.0, 2.0]);
//! ```
//!
//! Models can also be loaded from a JSON document via [`Config`], which covers the same surface:
//! queue parameters, routing edges, seeded arrivals and the random mode. See the
//! [`config`] module for the format.

#![warn(missing_docs)]
#![allow(clippy::needless_doctest_main)]

pub mod config;
pub mod error;
pub mod event;
pub mod random;
pub mod report;
pub mod routing;
pub mod scheduler;
pub mod simulation;
pub mod station;

pub use config::{Config, ConfigError};
pub use error::SimulationError;
pub use event::{Event, EventKind};
pub use random::RandomSource;
pub use report::{SimulationReport, StationReport};
pub use routing::{RoutingTable, Target, EPSILON};
pub use scheduler::EventScheduler;
pub use simulation::{RunState, Simulation};
pub use station::{Capacity, Id, Station, StationParams};
