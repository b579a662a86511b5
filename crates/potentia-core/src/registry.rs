//! The entity registry: sole owner of all state records.
//!
//! Nothing outside the registry may construct, relocate, or delete a
//! record. Storage is an append-only vector in registration order plus
//! a `BTreeMap` index for id lookup, so iteration is deterministic and
//! trailing removal ("remove the most recently added N") is cheap and
//! never reorders or renumbers survivors.
//!
//! Ids are dense indices: single registrations at the frontier and
//! batch registrations both assign ids starting at the current registry
//! size, which supports incremental "add another batch" growth.

use std::collections::BTreeMap;

use potentia_types::EntityId;

use crate::error::RegistryError;
use crate::record::{RecordSpec, StateRecord};

/// Owns the mapping from entity identity to its state record.
#[derive(Debug)]
pub struct Registry<S> {
    /// Records in registration order (append-only except trailing removal).
    records: Vec<StateRecord<S>>,
    /// Id -> position in `records`.
    index: BTreeMap<EntityId, usize>,
}

impl<S> Registry<S> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Number of records currently registered.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if no records are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `true` if a record with the given id exists.
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// The id the next frontier registration would receive: the current
    /// registry size as a dense index.
    pub fn next_id(&self) -> EntityId {
        // usize fits in u64 on all supported targets.
        EntityId::from_index(self.records.len() as u64)
    }

    /// Register one entity under an explicit id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the id is already
    /// present.
    pub fn register(&mut self, id: EntityId, spec: RecordSpec<S>) -> Result<EntityId, RegistryError> {
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateId { id });
        }
        self.index.insert(id, self.records.len());
        self.records.push(StateRecord::new(id, spec));
        Ok(id)
    }

    /// Register `count` entities with contiguous ids starting at
    /// [`next_id`](Self::next_id).
    ///
    /// The whole id range is validated before anything is inserted;
    /// there is no partial registration. Returns the assigned ids in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if any id in the range is
    /// already taken (possible when the host mixed in out-of-band
    /// explicit registrations), or [`RegistryError::IdExhausted`] if the
    /// range would pass `u64::MAX`.
    pub fn register_batch<F>(
        &mut self,
        count: usize,
        mut build: F,
    ) -> Result<Vec<EntityId>, RegistryError>
    where
        F: FnMut(EntityId) -> RecordSpec<S>,
    {
        let mut ids = Vec::with_capacity(count);
        let mut next = self.next_id().into_inner();
        for _ in 0..count {
            let id = EntityId::from_index(next);
            if self.index.contains_key(&id) {
                return Err(RegistryError::DuplicateId { id });
            }
            ids.push(id);
            next = next.checked_add(1).ok_or(RegistryError::IdExhausted)?;
        }

        for &id in &ids {
            self.index.insert(id, self.records.len());
            self.records.push(StateRecord::new(id, build(id)));
        }
        Ok(ids)
    }

    /// Look up a record for reading.
    pub fn get(&self, id: EntityId) -> Option<&StateRecord<S>> {
        self.index.get(&id).and_then(|&pos| self.records.get(pos))
    }

    /// Look up a record for mutation. Engine-internal.
    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut StateRecord<S>> {
        self.index
            .get(&id)
            .copied()
            .and_then(|pos| self.records.get_mut(pos))
    }

    /// Remove the `count` most recently registered records.
    ///
    /// Survivors keep their ids and their order. Observations of a
    /// removed id resolve to `NotFound`, never a crash.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidRange`] if `count` exceeds the
    /// registry size.
    pub fn remove_trailing(&mut self, count: usize) -> Result<(), RegistryError> {
        let len = self.records.len();
        if count > len {
            return Err(RegistryError::InvalidRange {
                requested: count,
                len,
            });
        }
        let keep = len.saturating_sub(count);
        for record in self.records.drain(keep..) {
            self.index.remove(&record.id());
        }
        Ok(())
    }

    /// Remove all records.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Iterate over all ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.records.iter().map(StateRecord::id)
    }

    /// Iterate over all records in registration order.
    pub fn records(&self) -> impl Iterator<Item = &StateRecord<S>> {
        self.records.iter()
    }
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use potentia_types::Tick;

    use super::*;
    use crate::record::EvolveError;

    fn accumulator(state: &f64, elapsed: Tick) -> Result<f64, EvolveError> {
        Ok(state + elapsed)
    }

    fn lazy_spec(initial: f64) -> RecordSpec<f64> {
        RecordSpec::lazy(initial, accumulator)
    }

    #[test]
    fn register_assigns_requested_id() {
        let mut registry = Registry::new();
        let id = registry.register(EntityId::from_index(0), lazy_spec(1.0)).unwrap();
        assert_eq!(id, EntityId::from_index(0));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(id));
        assert_eq!(*registry.get(id).unwrap().state(), 1.0);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry = Registry::new();
        registry.register(EntityId::from_index(0), lazy_spec(1.0)).unwrap();
        let err = registry
            .register(EntityId::from_index(0), lazy_spec(2.0))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateId {
                id: EntityId::from_index(0)
            }
        );
        // The first record is untouched.
        assert_eq!(*registry.get(EntityId::from_index(0)).unwrap().state(), 1.0);
    }

    #[test]
    fn batch_ids_are_contiguous_from_registry_size() {
        let mut registry = Registry::new();
        let first = registry.register_batch(3, |_| lazy_spec(0.0)).unwrap();
        assert_eq!(
            first,
            vec![
                EntityId::from_index(0),
                EntityId::from_index(1),
                EntityId::from_index(2)
            ]
        );

        // A second batch continues where the first ended.
        let second = registry.register_batch(2, |_| lazy_spec(0.0)).unwrap();
        assert_eq!(
            second,
            vec![EntityId::from_index(3), EntityId::from_index(4)]
        );
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn batch_collision_inserts_nothing() {
        let mut registry = Registry::new();
        // Occupy id 1 out-of-band so the batch range [0, 3) collides.
        registry.register(EntityId::from_index(1), lazy_spec(9.0)).unwrap();
        let err = registry.register_batch(3, |_| lazy_spec(0.0)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { .. }));
        // No partial registration: only the out-of-band record exists.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_trailing_keeps_survivor_ids() {
        let mut registry = Registry::new();
        registry.register_batch(5, |_| lazy_spec(0.0)).unwrap();
        registry.remove_trailing(2).unwrap();

        assert_eq!(registry.len(), 3);
        let surviving: Vec<EntityId> = registry.ids().collect();
        assert_eq!(
            surviving,
            vec![
                EntityId::from_index(0),
                EntityId::from_index(1),
                EntityId::from_index(2)
            ]
        );
        assert!(!registry.contains(EntityId::from_index(3)));
        assert!(!registry.contains(EntityId::from_index(4)));
    }

    #[test]
    fn remove_trailing_past_size_fails() {
        let mut registry = Registry::new();
        registry.register_batch(2, |_| lazy_spec(0.0)).unwrap();
        let err = registry.remove_trailing(3).unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidRange {
                requested: 3,
                len: 2
            }
        );
        // Nothing was removed.
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn ids_are_reassignable_after_trailing_removal() {
        let mut registry = Registry::new();
        registry.register_batch(4, |_| lazy_spec(0.0)).unwrap();
        registry.remove_trailing(2).unwrap();
        // The freed trailing range is reused by the next batch.
        let ids = registry.register_batch(1, |_| lazy_spec(0.0)).unwrap();
        assert_eq!(ids, vec![EntityId::from_index(2)]);
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut registry = Registry::new();
        registry.register_batch(3, |_| lazy_spec(0.0)).unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.next_id(), EntityId::from_index(0));
        assert!(registry.get(EntityId::from_index(0)).is_none());
    }

    #[test]
    fn build_closure_sees_the_assigned_id() {
        let mut registry = Registry::new();
        registry
            .register_batch(3, |id| {
                // Seed each record's state from its own id.
                #[allow(clippy::cast_precision_loss)]
                let initial = id.into_inner() as f64;
                lazy_spec(initial)
            })
            .unwrap();
        assert_eq!(*registry.get(EntityId::from_index(2)).unwrap().state(), 2.0);
    }
}
