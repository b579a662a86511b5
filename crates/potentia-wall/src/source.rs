//! The sweep: a sampling observation source for the wall.
//!
//! Stands in for the spatial "who is looking at what" detection a real
//! host would run. Each frame the sweep perceives a pseudo-random
//! window of clocks, sampled with replacement from a seeded RNG so runs
//! are reproducible. Repeats within a frame are deliberate: they land
//! on the engine's same-tick dedup rule and cost nothing.

use potentia_core::ObservationSource;
use potentia_types::{EntityId, Tick};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Observation source that perceives a random window of the wall each
/// frame.
#[derive(Debug)]
pub struct SweepSource {
    ids: Vec<EntityId>,
    window: usize,
    rng: StdRng,
}

impl SweepSource {
    /// Create a sweep over the given ids with a fixed window size and
    /// RNG seed.
    pub fn new(ids: Vec<EntityId>, window: usize, seed: u64) -> Self {
        Self {
            ids,
            window,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ObservationSource for SweepSource {
    fn perceived(&mut self, _tick: Tick) -> Vec<EntityId> {
        if self.ids.is_empty() || self.window == 0 {
            return Vec::new();
        }
        (0..self.window)
            .filter_map(|_| {
                let idx = self.rng.random_range(0..self.ids.len());
                self.ids.get(idx).copied()
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(count: u64) -> Vec<EntityId> {
        (0..count).map(EntityId::from_index).collect()
    }

    #[test]
    fn sweep_fills_its_window() {
        let mut sweep = SweepSource::new(ids(10), 4, 1);
        let perceived = sweep.perceived(1.0);
        assert_eq!(perceived.len(), 4);
        assert!(perceived.iter().all(|id| id.into_inner() < 10));
    }

    #[test]
    fn empty_wall_yields_no_perception() {
        let mut sweep = SweepSource::new(Vec::new(), 4, 1);
        assert!(sweep.perceived(1.0).is_empty());
    }

    #[test]
    fn zero_window_yields_no_perception() {
        let mut sweep = SweepSource::new(ids(10), 0, 1);
        assert!(sweep.perceived(1.0).is_empty());
    }

    #[test]
    fn same_seed_reproduces_the_sweep() {
        let mut first = SweepSource::new(ids(32), 6, 99);
        let mut second = SweepSource::new(ids(32), 6, 99);
        for tick in [1.0, 2.0, 3.0] {
            assert_eq!(first.perceived(tick), second.perceived(tick));
        }
    }
}
