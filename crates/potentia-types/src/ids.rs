//! Entity identifier and logical tick types.
//!
//! Entity ids are dense indices, not random tokens: the registry assigns
//! them contiguously starting at its current size, so a batch of N new
//! entities always occupies the id range `[len, len + N)`. This makes
//! incremental "add another batch" growth possible without renumbering
//! existing entities, and trailing removal is simply dropping the
//! highest-id records.
//!
//! The logical tick is a caller-supplied `f64` timestamp. The host owns
//! the clock; the engine only requires that ticks are finite and
//! non-decreasing per entity.

use serde::{Deserialize, Serialize};

/// The logical tick: a monotonic, host-supplied timestamp.
///
/// Ticks gap-measure observations -- the engine never generates them.
/// Any unit works (frames, seconds, beats) as long as the host supplies
/// finite values that never decrease for a given entity.
pub type Tick = f64;

/// Unique identifier for an entity tracked by the registry.
///
/// Ids are dense indices assigned at registration time and never reused
/// while the record exists. They are stable across trailing removal of
/// *other* records: survivors keep their ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Create an identifier from a raw dense index.
    ///
    /// Hosts normally receive ids from the registry rather than minting
    /// them; this constructor exists for bulk-creation bookkeeping and
    /// for tests.
    pub const fn from_index(index: u64) -> Self {
        Self(index)
    }

    /// Return the raw dense index.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(index: u64) -> Self {
        Self(index)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_index() {
        let a = EntityId::from_index(3);
        let b = EntityId::from_index(7);
        assert!(a < b);
        assert_eq!(a.into_inner(), 3);
    }

    #[test]
    fn id_display_matches_index() {
        let id = EntityId::from_index(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = EntityId::from_index(9);
        let json = serde_json::to_string(&original).unwrap();
        let restored: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn id_converts_to_and_from_u64() {
        let id: EntityId = 5_u64.into();
        let raw: u64 = id.into();
        assert_eq!(raw, 5);
    }
}
