//! Error types for the potentia-core crate.
//!
//! All operations that can fail return typed errors rather than
//! panicking. Expected conditions (missing entity, dedup hit, inert
//! record) are *not* errors -- they are [`Observation`] outcomes. The
//! types here cover host misuse of the registry and caller contract
//! violations during observation.
//!
//! [`Observation`]: potentia_types::Observation

use potentia_types::{EntityId, Tick};

use crate::record::EvolveError;

/// Errors raised by registry operations.
///
/// These indicate misuse by the host; they are reported immediately and
/// never affect other records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register an id that is already present.
    #[error("duplicate entity id: {id}")]
    DuplicateId {
        /// The id that was already registered.
        id: EntityId,
    },

    /// Attempted to remove more trailing records than the registry holds.
    #[error("invalid removal range: requested {requested} but registry holds {len}")]
    InvalidRange {
        /// How many records the caller asked to remove.
        requested: usize,
        /// How many records the registry actually holds.
        len: usize,
    },

    /// A snapshot referenced an id that is not in the registry.
    #[error("unknown entity id in snapshot: {id}")]
    UnknownId {
        /// The id the snapshot carried.
        id: EntityId,
    },

    /// The dense id space is exhausted.
    #[error("entity id space exhausted: cannot assign beyond u64::MAX")]
    IdExhausted,
}

/// Errors raised while observing a single entity.
///
/// Fatal to that entity's observation only: the record is left
/// unmodified and other ids in the same batch continue processing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObserveError {
    /// The observation source supplied a tick earlier than the record's
    /// last-known tick. A contract violation in the source; surfaced
    /// rather than clamped so the bug is visible.
    #[error(
        "non-monotonic tick for {id}: requested {requested} but last observed at {last_observed}"
    )]
    NonMonotonicTime {
        /// The entity being observed.
        id: EntityId,
        /// The record's last-observed tick.
        last_observed: Tick,
        /// The tick the caller supplied.
        requested: Tick,
    },

    /// The observation source supplied a NaN or infinite tick, which
    /// would silently defeat both the dedup equality and the
    /// monotonicity check.
    #[error("non-finite tick for {id}: {requested}")]
    NonFiniteTime {
        /// The entity being observed.
        id: EntityId,
        /// The tick the caller supplied.
        requested: Tick,
    },

    /// The entity's own evolution function failed. The record keeps its
    /// old state and timestamp.
    #[error("evolution failed for {id}: {source}")]
    Evolution {
        /// The entity whose evolution failed.
        id: EntityId,
        /// The failure the evolution implementation reported.
        #[source]
        source: EvolveError,
    },
}
