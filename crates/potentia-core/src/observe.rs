//! The reconstruction engine: single and batch observation.
//!
//! Observation is the only event that moves a record forward in time.
//! The engine measures the gap since the record's last observation,
//! invokes the entity's evolution function exactly once for the whole
//! gap, pushes the result to the presentation sink, and persists it.
//!
//! Two rules carry the correctness of the whole scheme:
//!
//! - **Same-tick deduplication**: a record already observed at the
//!   requested tick is a no-op. However many observers ask within one
//!   tick, the evolution function runs once.
//! - **All-or-nothing application**: on any failure the record keeps
//!   its old state *and* old timestamp. There is no state in which a
//!   record is partially updated.
//!
//! The engine is a stateless service: free functions over a mutably
//! borrowed [`Registry`], so the dedup-then-act sequence is atomic by
//! construction.

use potentia_types::{EntityId, Observation, Tick};
use tracing::{debug, warn};

use crate::error::ObserveError;
use crate::registry::Registry;

/// Observe a single entity at the given tick, reconstructing its state
/// if it is stale.
///
/// A missing id resolves to [`Observation::NotFound`] -- entities may be
/// destroyed between detection and observation, and that is not an
/// error.
///
/// # Errors
///
/// Returns [`ObserveError::NonFiniteTime`] or
/// [`ObserveError::NonMonotonicTime`] on caller contract violations,
/// and [`ObserveError::Evolution`] when the entity's own evolution
/// function fails. In every error case the record is left unmodified.
pub fn observe_one<S: Clone>(
    registry: &mut Registry<S>,
    id: EntityId,
    tick: Tick,
) -> Result<Observation<S>, ObserveError> {
    let Some(record) = registry.get_mut(id) else {
        debug!(%id, tick, "observed entity not in registry");
        return Ok(Observation::NotFound);
    };

    if !tick.is_finite() {
        warn!(%id, tick, "observation source supplied a non-finite tick");
        return Err(ObserveError::NonFiniteTime {
            id,
            requested: tick,
        });
    }

    // Same-tick dedup. Exact equality is the contract: the first
    // observer of (id, tick) reconstructs, every later one no-ops.
    #[allow(clippy::float_cmp)]
    if tick == record.last_observed() {
        debug!(%id, tick, "already current for this tick");
        return Ok(Observation::AlreadyCurrent);
    }

    // Inert records (no evolution function) never do work and never
    // error, whatever tick they are observed at.
    if record.is_inert() {
        debug!(%id, tick, "inert record observed");
        return Ok(Observation::Inert);
    }

    let last_observed = record.last_observed();
    let elapsed = tick - last_observed;
    if elapsed < 0.0 {
        warn!(
            %id,
            tick,
            last_observed,
            "observation source supplied a tick earlier than the record's last"
        );
        return Err(ObserveError::NonMonotonicTime {
            id,
            last_observed,
            requested: tick,
        });
    }

    let new_state = match record.evolution().map(|e| e.evolve(record.state(), elapsed)) {
        Some(Ok(state)) => state,
        Some(Err(source)) => {
            warn!(%id, tick, error = %source, "evolution failed; record unmodified");
            return Err(ObserveError::Evolution { id, source });
        }
        // Inert records already returned above.
        None => return Ok(Observation::Inert),
    };

    // Apply before persist: the sink must never lag a record that
    // already claims the new state.
    record.push_to_sink(&new_state);

    let reconstructed = new_state.clone();
    record.commit(new_state, tick);
    debug!(%id, tick, elapsed, "state reconstructed");
    Ok(Observation::Reconstructed(reconstructed))
}

/// Observe a batch of entities at one tick, in input order.
///
/// The id list is deliberately not deduplicated here: a repeated id hits
/// the same-tick rule on its second visit and becomes a no-op, which is
/// exactly the idempotence the contract requires. One failing id never
/// aborts the rest of the batch.
pub fn observe_batch<S: Clone>(
    registry: &mut Registry<S>,
    ids: &[EntityId],
    tick: Tick,
) -> Vec<Result<Observation<S>, ObserveError>> {
    ids.iter()
        .map(|&id| observe_one(registry, id, tick))
        .collect()
}
