//! Probabilistic routing of service completions.

use crate::error::SimulationError;
use crate::random::RandomSource;
use crate::station::Id;

/// Tolerance used when comparing probability sums.
pub const EPSILON: f64 = 1e-9;

/// Where a customer goes after finishing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Routed to another station of the network.
    Station(Id),
    /// Leaves the network.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    target: Target,
    probability: f64,
}

/// Ordered list of outgoing edges of one station, mapping cumulative
/// probability thresholds to targets.
///
/// Before a run starts the table is finalized: if the configured
/// probabilities sum to less than 1, an implicit [`Target::Exit`] edge takes
/// the remainder, so the table always sums to 1 within [`EPSILON`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingTable {
    edges: Vec<Edge>,
}

impl RoutingTable {
    /// Creates an empty table. Finalizing an empty table yields a single
    /// exit edge with probability 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outgoing edge.
    pub fn add(&mut self, target: Target, probability: f64) {
        self.edges.push(Edge {
            target,
            probability,
        });
    }

    /// Pads the table with an implicit exit edge if the configured
    /// probabilities fall short of 1; rejects sums above 1.
    pub fn finalize(&mut self) -> Result<(), SimulationError> {
        let sum = self.probability_sum();
        if sum > 1.0 + EPSILON {
            return Err(SimulationError::InvalidStation(format!(
                "routing probabilities sum to {sum}"
            )));
        }
        if self.edges.is_empty() || sum < 1.0 - EPSILON {
            self.add(Target::Exit, 1.0 - sum);
        }
        Ok(())
    }

    /// Sum of the edge probabilities.
    pub fn probability_sum(&self) -> f64 {
        self.edges.iter().map(|e| e.probability).sum()
    }

    /// Number of outgoing edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the table has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Selects the target of a service completion.
    ///
    /// With exactly one edge no draw is consumed and that edge's target is
    /// returned unconditionally, so callers must not assume a draw was taken.
    /// Otherwise one draw is taken and the first edge whose cumulative
    /// probability strictly exceeds it wins; if floating error lets the draw
    /// reach the end of the list, the customer takes the exit, which is the
    /// remainder edge whenever padding occurred.
    pub fn select(&self, random: &mut RandomSource) -> Result<Target, SimulationError> {
        if self.edges.len() == 1 {
            return Ok(self.edges[0].target);
        }
        let draw = random.next()?;
        let mut cumulative = 0.0;
        for edge in &self.edges {
            cumulative += edge.probability;
            if draw < cumulative {
                return Ok(edge.target);
            }
        }
        Ok(Target::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_edge_consumes_no_draw() {
        let mut table = RoutingTable::new();
        table.finalize().unwrap();
        assert_eq!(table.len(), 1);

        let mut random = RandomSource::literal(Vec::new());
        assert_eq!(table.select(&mut random).unwrap(), Target::Exit);
        assert_eq!(random.drawn(), 0);
    }

    #[test]
    fn split_follows_cumulative_thresholds() {
        let mut table = RoutingTable::new();
        table.add(Target::Station(1), 0.5);
        table.add(Target::Station(2), 0.5);
        table.finalize().unwrap();
        assert_eq!(table.len(), 2);

        let mut random = RandomSource::literal(vec![0.4, 0.6]);
        assert_eq!(table.select(&mut random).unwrap(), Target::Station(1));
        assert_eq!(table.select(&mut random).unwrap(), Target::Station(2));
    }

    #[test]
    fn deficit_is_padded_with_exit() {
        let mut table = RoutingTable::new();
        table.add(Target::Station(1), 0.3);
        table.finalize().unwrap();
        assert_eq!(table.len(), 2);
        assert!((table.probability_sum() - 1.0).abs() <= EPSILON);

        // A draw beyond the configured edge lands on the padded exit.
        let mut random = RandomSource::literal(vec![0.95]);
        assert_eq!(table.select(&mut random).unwrap(), Target::Exit);
    }

    #[test]
    fn full_sum_is_not_padded() {
        let mut table = RoutingTable::new();
        table.add(Target::Station(1), 0.25);
        table.add(Target::Station(2), 0.75);
        table.finalize().unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn excess_sum_is_rejected() {
        let mut table = RoutingTable::new();
        table.add(Target::Station(1), 0.8);
        table.add(Target::Station(2), 0.3);
        assert!(matches!(
            table.finalize(),
            Err(SimulationError::InvalidStation(_))
        ));
    }

    #[test]
    fn draw_past_all_edges_resolves_to_exit() {
        // A draw the cumulative sum never exceeds resolves to the exit
        // sentinel instead of failing, even past a station edge.
        let mut table = RoutingTable::new();
        table.add(Target::Station(1), 0.25);
        table.add(Target::Station(2), 0.25);
        let mut random = RandomSource::literal(vec![0.9]);
        assert_eq!(table.select(&mut random).unwrap(), Target::Exit);
    }

    #[test]
    fn select_propagates_exhaustion() {
        let mut table = RoutingTable::new();
        table.add(Target::Station(1), 0.5);
        table.add(Target::Station(2), 0.5);
        let mut random = RandomSource::literal(Vec::new());
        assert_eq!(
            table.select(&mut random),
            Err(SimulationError::RandomSourceExhausted { bound: 0 })
        );
    }
}
