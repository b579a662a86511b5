//! Serializable registry snapshot payloads.
//!
//! A snapshot captures the persistable half of every record -- id,
//! state, and last-observed tick. Evolution and apply functions are
//! code, not data: restoring a snapshot requires the host to rebuild
//! the registry with its own registration logic first, then lay the
//! captured states back over it.

use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, Tick};

/// Persistable view of a single entity state record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot<S> {
    /// The record's stable identity.
    pub id: EntityId,
    /// The state proven correct at `last_observed`.
    pub state: S,
    /// The tick at which `state` was last proven correct.
    pub last_observed: Tick,
}

/// Snapshot of an entire registry at a point in logical time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot<S> {
    /// The tick at which the host captured this snapshot.
    pub captured_at: Tick,
    /// One entry per record, in registration order.
    pub records: Vec<RecordSnapshot<S>>,
}

impl<S> RegistrySnapshot<S> {
    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if the snapshot contains no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_roundtrip_serde() {
        let snapshot = RegistrySnapshot {
            captured_at: 8.0,
            records: vec![RecordSnapshot {
                id: EntityId::from_index(0),
                state: 13_u32,
                last_observed: 8.0,
            }],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: RegistrySnapshot<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.len(), 1);
        assert!(!restored.is_empty());
    }
}
