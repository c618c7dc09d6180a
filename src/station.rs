//! Per-station queue state.
//!
//! A station is one G/G/c node of the network: a server pool, an optional
//! finite waiting room, uniform service (and optionally arrival) interval
//! bounds, a routing table for customers finishing service, and the
//! statistics the run accumulates for it. Occupancy is the station's state
//! machine; the only transitions are [`Station::accept`] and
//! [`Station::release`], driven exclusively by the engine's dispatch logic.

use crate::error::SimulationError;
use crate::routing::RoutingTable;

/// Identifier of a station within one simulation.
pub type Id = u32;

/// Total room at a station, servers plus waiting positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most this many customers at any instant.
    Finite(u64),
    /// No bound on occupancy.
    Unbounded,
}

impl Capacity {
    /// Converts the raw model-file value: `-1` is the unbounded sentinel,
    /// any other negative value is invalid.
    pub fn from_raw(raw: i64) -> Result<Self, SimulationError> {
        match raw {
            -1 => Ok(Self::Unbounded),
            n if n < 0 => Err(SimulationError::InvalidCapacity(raw)),
            n => Ok(Self::Finite(n as u64)),
        }
    }

    /// The finite bound, or `None` when unbounded.
    pub fn limit(&self) -> Option<u64> {
        match self {
            Self::Finite(n) => Some(*n),
            Self::Unbounded => None,
        }
    }

    fn admits(&self, occupancy: u64) -> bool {
        match self {
            Self::Finite(n) => occupancy < *n,
            Self::Unbounded => true,
        }
    }
}

/// Construction parameters of one station.
#[derive(Debug, Clone)]
pub struct StationParams {
    /// Human-readable station name, unique within a simulation.
    pub name: String,
    /// Number of servers, at least 1.
    pub servers: u32,
    /// Total room at the station.
    pub capacity: Capacity,
    /// Exogenous inter-arrival interval `(min, max)`; `None` means the
    /// station receives customers only through routing.
    pub arrival: Option<(f64, f64)>,
    /// Service time interval `(min, max)`.
    pub service: (f64, f64),
}

/// One queueing node and its accumulated statistics.
#[derive(Debug, Clone)]
pub struct Station {
    id: Id,
    name: String,
    servers: u32,
    capacity: Capacity,
    arrival: Option<(f64, f64)>,
    service: (f64, f64),
    routing: RoutingTable,
    occupancy: u64,
    losses: u64,
    histogram: Vec<f64>,
}

fn check_interval(name: &str, what: &str, (min, max): (f64, f64)) -> Result<(), SimulationError> {
    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(SimulationError::InvalidStation(format!(
            "{name}: {what} interval [{min}, {max}] is not a valid range"
        )));
    }
    Ok(())
}

impl Station {
    /// Creates a station from validated parameters.
    pub fn new(id: Id, params: StationParams) -> Result<Self, SimulationError> {
        if params.servers == 0 {
            return Err(SimulationError::InvalidStation(format!(
                "{}: station must have at least one server",
                params.name
            )));
        }
        check_interval(&params.name, "service", params.service)?;
        if let Some(arrival) = params.arrival {
            check_interval(&params.name, "arrival", arrival)?;
        }
        Ok(Self {
            id,
            name: params.name,
            servers: params.servers,
            capacity: params.capacity,
            arrival: params.arrival,
            service: params.service,
            routing: RoutingTable::new(),
            occupancy: 0,
            losses: 0,
            histogram: Vec::new(),
        })
    }

    /// Admits an arriving customer if there is room, otherwise counts a
    /// loss and returns `false`. This is the only path that changes the
    /// loss counter.
    pub fn accept(&mut self) -> bool {
        if self.capacity.admits(self.occupancy) {
            self.occupancy += 1;
            true
        } else {
            self.losses += 1;
            false
        }
    }

    /// Removes a departing customer. Callers must have verified that the
    /// station is non-empty.
    pub fn release(&mut self) {
        debug_assert!(self.occupancy > 0, "release on empty station {}", self.name);
        self.occupancy -= 1;
    }

    /// Whether every server is busy (occupancy ≥ servers). After a release
    /// this means a waiting customer seizes the freed server.
    pub fn is_saturated(&self) -> bool {
        self.occupancy >= u64::from(self.servers)
    }

    /// Whether the customer just admitted seized a server rather than
    /// joining the waiting line (occupancy ≤ servers, checked after the
    /// increment).
    pub fn entering_service(&self) -> bool {
        self.occupancy <= u64::from(self.servers)
    }

    /// Adds `delta` simulated time to the histogram bucket of `level`,
    /// growing the storage for unseen levels.
    pub fn accrue(&mut self, level: usize, delta: f64) {
        if self.histogram.len() <= level {
            self.histogram.resize(level + 1, 0.0);
        }
        self.histogram[level] += delta;
    }

    /// Clears occupancy, losses and the histogram. Called once when a run
    /// starts; stations persist for the whole run afterwards.
    pub fn reset(&mut self) {
        self.occupancy = 0;
        self.losses = 0;
        self.histogram.clear();
    }

    /// Station identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Station name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of servers.
    pub fn servers(&self) -> u32 {
        self.servers
    }

    /// Total room at the station.
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Exogenous inter-arrival bounds, if the station has its own arrival
    /// stream.
    pub fn arrival(&self) -> Option<(f64, f64)> {
        self.arrival
    }

    /// Service time bounds.
    pub fn service(&self) -> (f64, f64) {
        self.service
    }

    /// The station's routing table.
    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub(crate) fn routing_mut(&mut self) -> &mut RoutingTable {
        &mut self.routing
    }

    /// Current number of customers at the station.
    pub fn occupancy(&self) -> u64 {
        self.occupancy
    }

    /// Customers turned away because the station was full.
    pub fn losses(&self) -> u64 {
        self.losses
    }

    /// Time-weighted occupancy histogram: index is the occupancy level,
    /// value the total simulated time spent at that level.
    pub fn histogram(&self) -> &[f64] {
        &self.histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(servers: u32, capacity: Capacity) -> Station {
        Station::new(
            0,
            StationParams {
                name: "test".into(),
                servers,
                capacity,
                arrival: None,
                service: (1.0, 2.0),
            },
        )
        .unwrap()
    }

    #[test]
    fn accept_counts_losses_only_when_full() {
        let mut s = station(1, Capacity::Finite(2));
        assert!(s.accept());
        assert!(s.accept());
        assert_eq!(s.occupancy(), 2);
        assert_eq!(s.losses(), 0);
        assert!(!s.accept());
        assert_eq!(s.occupancy(), 2);
        assert_eq!(s.losses(), 1);
        s.release();
        assert!(s.accept());
        assert_eq!(s.losses(), 1);
    }

    #[test]
    fn zero_capacity_loses_everything() {
        let mut s = station(1, Capacity::Finite(0));
        assert!(!s.accept());
        assert!(!s.accept());
        assert_eq!(s.losses(), 2);
        assert_eq!(s.occupancy(), 0);
    }

    #[test]
    fn unbounded_station_never_loses() {
        let mut s = station(2, Capacity::Unbounded);
        for _ in 0..1000 {
            assert!(s.accept());
        }
        assert_eq!(s.occupancy(), 1000);
        assert_eq!(s.losses(), 0);
    }

    #[test]
    fn saturation_tracks_server_count() {
        let mut s = station(2, Capacity::Unbounded);
        assert!(!s.is_saturated());
        s.accept();
        assert!(s.entering_service());
        assert!(!s.is_saturated());
        s.accept();
        assert!(s.entering_service());
        assert!(s.is_saturated());
        s.accept();
        assert!(!s.entering_service());
        s.release();
        assert!(s.is_saturated());
    }

    #[test]
    fn histogram_grows_on_demand() {
        let mut s = station(1, Capacity::Unbounded);
        s.accrue(0, 1.5);
        s.accrue(3, 0.5);
        s.accrue(0, 0.5);
        assert_eq!(s.histogram(), &[2.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn capacity_sentinel_round_trip() {
        assert_eq!(Capacity::from_raw(-1).unwrap(), Capacity::Unbounded);
        assert_eq!(Capacity::from_raw(0).unwrap(), Capacity::Finite(0));
        assert_eq!(Capacity::from_raw(7).unwrap(), Capacity::Finite(7));
        assert_eq!(
            Capacity::from_raw(-2),
            Err(SimulationError::InvalidCapacity(-2))
        );
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let bad_servers = Station::new(
            0,
            StationParams {
                name: "s".into(),
                servers: 0,
                capacity: Capacity::Unbounded,
                arrival: None,
                service: (1.0, 2.0),
            },
        );
        assert!(matches!(
            bad_servers,
            Err(SimulationError::InvalidStation(_))
        ));

        let inverted_service = Station::new(
            0,
            StationParams {
                name: "s".into(),
                servers: 1,
                capacity: Capacity::Unbounded,
                arrival: None,
                service: (2.0, 1.0),
            },
        );
        assert!(matches!(
            inverted_service,
            Err(SimulationError::InvalidStation(_))
        ));

        let negative_arrival = Station::new(
            0,
            StationParams {
                name: "s".into(),
                servers: 1,
                capacity: Capacity::Unbounded,
                arrival: Some((-1.0, 1.0)),
                service: (1.0, 2.0),
            },
        );
        assert!(matches!(
            negative_arrival,
            Err(SimulationError::InvalidStation(_))
        ));
    }

    #[test]
    fn reset_clears_run_state() {
        let mut s = station(1, Capacity::Finite(1));
        s.accept();
        s.accept();
        s.accrue(1, 3.0);
        s.reset();
        assert_eq!(s.occupancy(), 0);
        assert_eq!(s.losses(), 0);
        assert!(s.histogram().is_empty());
    }
}
