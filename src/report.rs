//! Final statistics of a run.
//!
//! The report is plain data: everything derives `Serialize` for machine
//! consumption, and [`SimulationReport`] implements `Display` with the
//! classic state/time/probability table for humans.

use std::fmt;

use colored::Colorize;
use serde::Serialize;

use crate::station::{Capacity, Station};

/// Per-station results of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    /// Station name.
    pub name: String,
    /// Number of servers.
    pub servers: u32,
    /// Finite capacity, or `None` when unbounded.
    pub capacity: Option<u64>,
    /// Service time bounds `(min, max)`.
    pub service: (f64, f64),
    /// Time-weighted occupancy histogram: index is the occupancy level,
    /// value the total simulated time spent at that level.
    pub histogram: Vec<f64>,
    /// Customers turned away because the station was full.
    pub losses: u64,
}

impl StationReport {
    fn of(station: &Station) -> Self {
        Self {
            name: station.name().to_owned(),
            servers: station.servers(),
            capacity: match station.capacity() {
                Capacity::Finite(n) => Some(n),
                Capacity::Unbounded => None,
            },
            service: station.service(),
            histogram: station.histogram().to_vec(),
            losses: station.losses(),
        }
    }

    /// Fraction of the run spent at occupancy `level`, given the run's
    /// total elapsed time.
    pub fn probability(&self, level: usize, total_time: f64) -> f64 {
        if total_time <= 0.0 {
            return 0.0;
        }
        self.histogram.get(level).copied().unwrap_or(0.0) / total_time
    }
}

/// Aggregated results of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Total elapsed simulated time.
    pub total_time: f64,
    /// One entry per station, in station id order.
    pub stations: Vec<StationReport>,
}

impl SimulationReport {
    pub(crate) fn new(total_time: f64, stations: &[Station]) -> Self {
        Self {
            total_time,
            stations: stations.iter().map(StationReport::of).collect(),
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for station in &self.stations {
            let kendall = match station.capacity {
                Some(capacity) => format!("G/G/{}/{}", station.servers, capacity),
                None => format!("G/G/{}", station.servers),
            };
            writeln!(f, "{} ({})", format!("Station: {}", station.name).bold(), kendall)?;
            writeln!(f, "Service: {} ... {}", station.service.0, station.service.1)?;
            writeln!(f, "{}", "State   Time          Probability".dimmed())?;
            for (level, time) in station.histogram.iter().enumerate() {
                if *time <= 0.0 {
                    continue;
                }
                let pct = station.probability(level, self.total_time) * 100.0;
                writeln!(f, "  {level:<5} {time:>12.4} {pct:>10.2}%")?;
            }
            writeln!(f, "Lost customers: {}", station.losses)?;
            writeln!(f)?;
        }
        writeln!(f, "Total simulation time: {:.4}", self.total_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::StationParams;

    fn sample() -> SimulationReport {
        let mut station = Station::new(
            0,
            StationParams {
                name: "q1".into(),
                servers: 1,
                capacity: Capacity::Finite(3),
                arrival: None,
                service: (1.0, 2.0),
            },
        )
        .unwrap();
        station.accrue(0, 6.0);
        station.accrue(1, 2.0);
        SimulationReport::new(8.0, &[station])
    }

    #[test]
    fn probabilities_are_time_fractions() {
        let report = sample();
        let q1 = &report.stations[0];
        assert_eq!(q1.probability(0, report.total_time), 0.75);
        assert_eq!(q1.probability(1, report.total_time), 0.25);
        assert_eq!(q1.probability(2, report.total_time), 0.0);
        assert_eq!(q1.probability(0, 0.0), 0.0);
    }

    #[test]
    fn serializes_to_json() -> Result<(), serde_json::Error> {
        let report = sample();
        let json = serde_json::to_string(&report)?;
        assert!(json.contains("\"total_time\":8.0"));
        assert!(json.contains("\"losses\":0"));
        Ok(())
    }

    #[test]
    fn render_includes_kendall_notation() {
        let report = sample();
        let text = report.to_string();
        assert!(text.contains("G/G/1/3"));
        assert!(text.contains("Lost customers: 0"));
        assert!(text.contains("Total simulation time: 8.0000"));
    }
}
