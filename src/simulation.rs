//! The discrete-event engine.
//!
//! [`Simulation`] owns the global clock, the stations, the event scheduler
//! and the random source, and drives the main loop: pop the next event,
//! accrue time-weighted occupancy statistics while advancing the clock,
//! dispatch the event, push whatever follow-up events it produces. The run
//! ends when the scheduler drains or the random source is exhausted,
//! whichever comes first.
//!
//! All state is owned by one `Simulation` value, so independent simulations
//! compose safely in the same process.

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::error::SimulationError;
use crate::event::{Event, EventKind};
use crate::random::RandomSource;
use crate::report::SimulationReport;
use crate::routing::Target;
use crate::scheduler::EventScheduler;
use crate::station::{Id, Station, StationParams};

/// Execution state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Stations and events may still be added.
    NotStarted,
    /// The main loop is in progress.
    Running,
    /// Both termination conditions were checked and one held; the
    /// simulation will not process further events.
    Terminated,
}

/// A queueing-network simulation: topology, clock, pending events and the
/// bounded random source, with the main loop that ties them together.
#[derive(Debug)]
pub struct Simulation {
    stations: Vec<Station>,
    names: FxHashMap<String, Id>,
    scheduler: EventScheduler,
    random: RandomSource,
    clock: f64,
    state: RunState,
}

impl Simulation {
    /// Creates an empty simulation drawing from `random`.
    pub fn new(random: RandomSource) -> Self {
        Self {
            stations: Vec::new(),
            names: FxHashMap::default(),
            scheduler: EventScheduler::new(),
            random,
            clock: 0.0,
            state: RunState::NotStarted,
        }
    }

    /// Adds a station and returns its id. Station names must be unique.
    pub fn add_station(&mut self, params: StationParams) -> Result<Id, SimulationError> {
        if self.names.contains_key(&params.name) {
            return Err(SimulationError::InvalidStation(format!(
                "duplicate station name '{}'",
                params.name
            )));
        }
        let id = self.stations.len() as Id;
        let name = params.name.clone();
        self.stations.push(Station::new(id, params)?);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Adds a routing edge from `source`. `None` as target is an explicit
    /// exit edge. Target ids are resolved when a customer is dispatched, so
    /// an edge may reference a station added later.
    pub fn add_route(
        &mut self,
        source: Id,
        target: Option<Id>,
        probability: f64,
    ) -> Result<(), SimulationError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SimulationError::InvalidStation(format!(
                "routing probability {probability} outside [0, 1]"
            )));
        }
        let target = match target {
            Some(id) => Target::Station(id),
            None => Target::Exit,
        };
        Self::station_of_mut(&mut self.stations, source)?
            .routing_mut()
            .add(target, probability);
        Ok(())
    }

    /// Looks up a station id by name.
    pub fn lookup(&self, name: &str) -> Option<Id> {
        self.names.get(name).copied()
    }

    /// Seeds an exogenous arrival at `target` at absolute time `time`.
    pub fn schedule_arrival(&mut self, target: Id, time: f64) {
        self.scheduler.push(Event::arrival(time, target));
    }

    /// Finalizes the routing tables, resets per-station statistics and
    /// transitions to [`RunState::Running`]. Called implicitly by the first
    /// [`step`](Self::step); a no-op once the run has started.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        if self.state != RunState::NotStarted {
            return Ok(());
        }
        for station in &mut self.stations {
            station.reset();
            station.routing_mut().finalize()?;
        }
        self.state = RunState::Running;
        debug!(
            "starting: {} stations, {} seeded events, {} draws available",
            self.stations.len(),
            self.scheduler.len(),
            self.random.bound()
        );
        Ok(())
    }

    /// Processes the next event. Returns `Ok(false)` once the run has
    /// terminated: either no events are pending or the random source is
    /// exhausted. The latter intentionally ends the run even with events
    /// still scheduled.
    pub fn step(&mut self) -> Result<bool, SimulationError> {
        self.start()?;
        if self.state == RunState::Terminated {
            return Ok(false);
        }
        if self.scheduler.is_empty() || !self.random.has_more() {
            self.state = RunState::Terminated;
            debug!(
                "terminated at {:.4}: {} draws used, {} events still pending",
                self.clock,
                self.random.drawn(),
                self.scheduler.len()
            );
            return Ok(false);
        }
        let event = self.scheduler.pop()?;
        self.advance_to(event.time);
        trace!("[{:.4}] {:?}", self.clock, event.kind);
        match event.kind {
            EventKind::Arrival { target } => self.handle_arrival(target)?,
            EventKind::Departure { source } => self.handle_departure(source)?,
            EventKind::Passage { source, target } => {
                self.handle_departure(source)?;
                self.admit(target)?;
            }
        }
        Ok(true)
    }

    /// Runs the main loop to termination.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        while self.step()? {}
        Ok(())
    }

    /// Current simulated time.
    pub fn time(&self) -> f64 {
        self.clock
    }

    /// Current execution state.
    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Number of events still pending in the scheduler.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Number of random draws consumed so far.
    pub fn draws_used(&self) -> u64 {
        self.random.drawn()
    }

    /// The station with the given id, if configured.
    pub fn station(&self, id: Id) -> Option<&Station> {
        self.stations.get(id as usize)
    }

    /// All configured stations.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Snapshot of the accumulated statistics.
    pub fn report(&self) -> SimulationReport {
        SimulationReport::new(self.clock, &self.stations)
    }

    /// Moves the clock to `time`, charging the elapsed interval to every
    /// station's current occupancy level.
    fn advance_to(&mut self, time: f64) {
        debug_assert!(time >= self.clock, "clock moved backwards");
        let delta = time - self.clock;
        for station in &mut self.stations {
            let level = station.occupancy() as usize;
            station.accrue(level, delta);
        }
        self.clock = time;
    }

    /// An exogenous arrival: admit the customer, then re-arm the station's
    /// arrival stream. Routed (passage) arrivals skip the re-arming.
    fn handle_arrival(&mut self, id: Id) -> Result<(), SimulationError> {
        self.admit(id)?;
        let arrival = Self::station_of(&self.stations, id)?.arrival();
        if let Some((min, max)) = arrival {
            if let Some(delay) = self.uniform(min, max) {
                let event = Event::arrival(self.clock + delay, id);
                self.scheduler.push(event);
            }
        }
        Ok(())
    }

    /// A service completion: the customer leaves, and if the station is
    /// still saturated a waiting customer enters service.
    fn handle_departure(&mut self, id: Id) -> Result<(), SimulationError> {
        let station = Self::station_of_mut(&mut self.stations, id)?;
        station.release();
        if station.is_saturated() {
            self.schedule_completion(id)?;
        }
        Ok(())
    }

    /// Offers a customer to station `id`; if admitted straight into service,
    /// schedules its completion.
    fn admit(&mut self, id: Id) -> Result<(), SimulationError> {
        let station = Self::station_of_mut(&mut self.stations, id)?;
        if !station.accept() {
            trace!("[{:.4}] customer lost at {}", self.clock, station.name());
            return Ok(());
        }
        if station.entering_service() {
            self.schedule_completion(id)?;
        }
        Ok(())
    }

    /// Draws the next hop and the service duration for the customer entering
    /// service at `id`, then schedules the resulting passage or departure.
    ///
    /// The random source running dry partway through leaves the follow-up
    /// unscheduled and lets the dispatch finish; the main loop then observes
    /// the exhausted source and terminates the run.
    fn schedule_completion(&mut self, id: Id) -> Result<(), SimulationError> {
        let station = Self::station_of(&self.stations, id)?;
        let (min, max) = station.service();
        let next = match station.routing().select(&mut self.random) {
            Ok(target) => target,
            Err(SimulationError::RandomSourceExhausted { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };
        let Some(duration) = self.uniform(min, max) else {
            return Ok(());
        };
        let event = match next {
            Target::Station(target) => Event::passage(self.clock + duration, id, target),
            Target::Exit => Event::departure(self.clock + duration, id),
        };
        self.scheduler.push(event);
        Ok(())
    }

    /// Uniform draw in `[min, max]`, or `None` when the source has run dry
    /// (exhaustion is the only failure `RandomSource::next` can produce).
    fn uniform(&mut self, min: f64, max: f64) -> Option<f64> {
        self.random.next().ok().map(|draw| min + (max - min) * draw)
    }

    fn station_of(stations: &[Station], id: Id) -> Result<&Station, SimulationError> {
        stations
            .get(id as usize)
            .ok_or(SimulationError::UnknownStation(id))
    }

    fn station_of_mut(
        stations: &mut [Station],
        id: Id,
    ) -> Result<&mut Station, SimulationError> {
        stations
            .get_mut(id as usize)
            .ok_or(SimulationError::UnknownStation(id))
    }
}
