//! Registry snapshot capture and restore.
//!
//! Snapshots carry the persistable half of every record (id, state,
//! last-observed tick). Evolution and apply functions are code, not
//! data, so restoration is a two-step protocol: the host rebuilds the
//! registry with its own registration logic, then lays the captured
//! states back over the matching ids. Restore validates every id before
//! touching anything -- there is no partial restore.

use potentia_types::{RecordSnapshot, RegistrySnapshot, Tick};

use crate::error::RegistryError;
use crate::registry::Registry;

impl<S: Clone> Registry<S> {
    /// Capture a snapshot of every record, in registration order.
    ///
    /// `captured_at` is the host's current tick, recorded for the
    /// host's own bookkeeping; it does not affect the records.
    pub fn snapshot(&self, captured_at: Tick) -> RegistrySnapshot<S> {
        RegistrySnapshot {
            captured_at,
            records: self
                .records()
                .map(|record| RecordSnapshot {
                    id: record.id(),
                    state: record.state().clone(),
                    last_observed: record.last_observed(),
                })
                .collect(),
        }
    }

    /// Lay a snapshot's states back over an already-rebuilt registry.
    ///
    /// Every snapshot entry must match a registered id. Entries restore
    /// both the state and the last-observed tick; records not named in
    /// the snapshot are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownId`] if any entry references an
    /// id that is not registered. Nothing is modified in that case.
    pub fn restore(&mut self, snapshot: RegistrySnapshot<S>) -> Result<(), RegistryError> {
        // Validate the full id set first; no partial restore.
        for entry in &snapshot.records {
            if !self.contains(entry.id) {
                return Err(RegistryError::UnknownId { id: entry.id });
            }
        }
        for entry in snapshot.records {
            if let Some(record) = self.get_mut(entry.id) {
                record.commit(entry.state, entry.last_observed);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use potentia_types::EntityId;

    use super::*;
    use crate::observe::observe_one;
    use crate::record::{EvolveError, RecordSpec};

    fn accumulator(state: &f64, elapsed: Tick) -> Result<f64, EvolveError> {
        Ok(state + elapsed)
    }

    fn wall(initial: f64) -> Registry<f64> {
        let mut registry = Registry::new();
        registry
            .register_batch(3, |_| RecordSpec::lazy(initial, accumulator))
            .unwrap();
        registry
    }

    #[test]
    fn snapshot_captures_states_and_timestamps() {
        let mut registry = wall(10.0);
        observe_one(&mut registry, EntityId::from_index(1), 4.0).unwrap();

        let snapshot = registry.snapshot(4.0);
        assert_eq!(snapshot.captured_at, 4.0);
        assert_eq!(snapshot.len(), 3);

        let advanced = snapshot
            .records
            .iter()
            .find(|entry| entry.id == EntityId::from_index(1))
            .unwrap();
        assert_eq!(advanced.state, 14.0);
        assert_eq!(advanced.last_observed, 4.0);
    }

    #[test]
    fn restore_lays_states_over_a_rebuilt_registry() {
        let mut original = wall(10.0);
        observe_one(&mut original, EntityId::from_index(0), 6.0).unwrap();
        let snapshot = original.snapshot(6.0);

        // A fresh registry rebuilt by the host's registration logic.
        let mut rebuilt = wall(0.0);
        rebuilt.restore(snapshot).unwrap();

        let restored = rebuilt.get(EntityId::from_index(0)).unwrap();
        assert_eq!(*restored.state(), 16.0);
        assert_eq!(restored.last_observed(), 6.0);

        // Evolution still works from the restored timestamp.
        let outcome = observe_one(&mut rebuilt, EntityId::from_index(0), 10.0).unwrap();
        assert!(outcome.is_reconstructed());
        assert_eq!(*rebuilt.get(EntityId::from_index(0)).unwrap().state(), 20.0);
    }

    #[test]
    fn restore_with_unknown_id_modifies_nothing() {
        let mut original = wall(10.0);
        observe_one(&mut original, EntityId::from_index(0), 6.0).unwrap();
        let snapshot = original.snapshot(6.0);

        // Rebuilt registry is smaller than the snapshot expects.
        let mut rebuilt = Registry::new();
        rebuilt
            .register_batch(1, |_| RecordSpec::lazy(0.0, accumulator))
            .unwrap();

        let err = rebuilt.restore(snapshot).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownId { .. }));
        assert_eq!(*rebuilt.get(EntityId::from_index(0)).unwrap().state(), 0.0);
    }
}
