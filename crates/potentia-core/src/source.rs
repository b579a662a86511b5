//! Observation source seam and batch plumbing.
//!
//! The engine never decides what is being looked at. Once per tick the
//! host-side [`ObservationSource`] -- a spatial query, an input handler,
//! a scripted sweep, a test stub -- produces the list of entity ids
//! currently perceived, and [`observe_from`] drains it into the engine.
//!
//! The [`StubObservationSource`] perceives a fixed id list every tick,
//! which lets a host loop be exercised end-to-end before any real
//! perception mechanism exists.

use potentia_types::{EntityId, Observation, Tick};

use crate::error::ObserveError;
use crate::observe;
use crate::registry::Registry;

/// A source of perceived entity ids.
///
/// Implementations are queried once per logical tick. The ids returned
/// need not be deduplicated or sorted, and may include ids that no
/// longer exist -- the engine resolves those to `NotFound`. The source
/// must supply tick values that never decrease for any given entity.
pub trait ObservationSource {
    /// Return the ids perceived at the given tick.
    fn perceived(&mut self, tick: Tick) -> Vec<EntityId>;
}

/// An observation source that perceives the same ids every tick.
#[derive(Debug, Clone, Default)]
pub struct StubObservationSource {
    ids: Vec<EntityId>,
}

impl StubObservationSource {
    /// Create a stub that always perceives the given ids.
    pub const fn new(ids: Vec<EntityId>) -> Self {
        Self { ids }
    }

    /// Create a stub that never perceives anything.
    pub const fn empty() -> Self {
        Self { ids: Vec::new() }
    }
}

impl ObservationSource for StubObservationSource {
    fn perceived(&mut self, _tick: Tick) -> Vec<EntityId> {
        self.ids.clone()
    }
}

/// Query a source for the current tick's perceived ids and observe them
/// all, in the order the source produced them.
pub fn observe_from<S: Clone>(
    registry: &mut Registry<S>,
    source: &mut dyn ObservationSource,
    tick: Tick,
) -> Vec<Result<Observation<S>, ObserveError>> {
    let ids = source.perceived(tick);
    observe::observe_batch(registry, &ids, tick)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::record::{EvolveError, RecordSpec};

    fn accumulator(state: &f64, elapsed: Tick) -> Result<f64, EvolveError> {
        Ok(state + elapsed)
    }

    #[test]
    fn stub_perceives_its_fixed_ids() {
        let ids = vec![EntityId::from_index(0), EntityId::from_index(1)];
        let mut source = StubObservationSource::new(ids.clone());
        assert_eq!(source.perceived(1.0), ids);
        assert_eq!(source.perceived(2.0), ids);
    }

    #[test]
    fn empty_stub_perceives_nothing() {
        let mut source = StubObservationSource::empty();
        assert!(source.perceived(1.0).is_empty());
    }

    #[test]
    fn observe_from_drains_the_source() {
        let mut registry = Registry::new();
        let ids = registry
            .register_batch(2, |_| RecordSpec::lazy(0.0, accumulator))
            .unwrap();
        let mut source = StubObservationSource::new(ids.clone());

        let results = observe_from(&mut registry, &mut source, 3.0);
        assert_eq!(results.len(), 2);
        for result in results {
            assert_eq!(result.unwrap(), Observation::Reconstructed(3.0));
        }

        // Same tick again: every id hits the dedup rule.
        let repeat = observe_from(&mut registry, &mut source, 3.0);
        for result in repeat {
            assert_eq!(result.unwrap(), Observation::AlreadyCurrent);
        }
    }
}
