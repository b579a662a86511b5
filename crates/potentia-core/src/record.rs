//! Entity state records and the contracts entities supply.
//!
//! A [`StateRecord`] is the unit of lazy state: the state proven correct
//! at the last observation, the tick of that observation, and the
//! entity's own [`Evolution`] and [`ApplySink`] functions. The state
//! type `S` is entity-defined and opaque to the engine -- it is the
//! minimal sufficient statistic for continuing evolution; anything more
//! expensive belongs in the apply sink.
//!
//! Records are owned exclusively by the [`Registry`]; only the
//! reconstruction engine mutates them, and only with the result of
//! `evolution`.
//!
//! [`Registry`]: crate::registry::Registry

use core::fmt;

use potentia_types::{EntityId, Tick};

/// Error returned by an [`Evolution`] implementation.
///
/// The engine treats any evolution failure as recoverable: the record is
/// left unmodified and the failure is reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct EvolveError {
    /// Description of why the new state could not be computed.
    pub reason: String,
}

impl EvolveError {
    /// Create an evolution error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The reconstruction contract an entity supplies at registration.
///
/// `evolve` must be deterministic and side-effect-free: given the same
/// state and elapsed time it must always return the same output. That
/// determinism is what makes compressing N unsimulated ticks into one
/// call valid.
///
/// Implemented automatically for any
/// `Fn(&S, Tick) -> Result<S, EvolveError>` closure.
pub trait Evolution<S> {
    /// Compute the state after `elapsed` ticks have passed.
    ///
    /// `elapsed` is always finite and non-negative; the engine rejects
    /// anything else before calling.
    ///
    /// # Errors
    ///
    /// Returns [`EvolveError`] if the new state cannot be computed. The
    /// engine leaves the record untouched in that case.
    fn evolve(&self, state: &S, elapsed: Tick) -> Result<S, EvolveError>;
}

impl<S, F> Evolution<S> for F
where
    F: Fn(&S, Tick) -> Result<S, EvolveError>,
{
    fn evolve(&self, state: &S, elapsed: Tick) -> Result<S, EvolveError> {
        self(state, elapsed)
    }
}

/// The presentation contract an entity supplies at registration.
///
/// Called once per successful reconstruction, *before* the new state is
/// persisted into the record. This is the only channel by which
/// reconstructed state reaches anything outside the engine.
///
/// Implemented automatically for any `FnMut(&S)` closure.
pub trait ApplySink<S> {
    /// Push a freshly reconstructed state to the presentation side.
    fn apply(&mut self, state: &S);
}

impl<S, F> ApplySink<S> for F
where
    F: FnMut(&S),
{
    fn apply(&mut self, state: &S) {
        self(state);
    }
}

/// Parameter bundle for registering one entity.
///
/// Bundles the initial state, spawn tick, and the optional evolution
/// and apply functions so registration signatures stay manageable.
pub struct RecordSpec<S> {
    pub(crate) initial_state: S,
    pub(crate) spawned_at: Tick,
    pub(crate) evolution: Option<Box<dyn Evolution<S>>>,
    pub(crate) on_apply: Option<Box<dyn ApplySink<S>>>,
}

impl<S> RecordSpec<S> {
    /// Spec for a lazy entity with the given evolution function.
    ///
    /// The spawn tick defaults to `0.0`; override with
    /// [`spawned_at`](Self::spawned_at) for entities created mid-run.
    pub fn lazy(initial_state: S, evolution: impl Evolution<S> + 'static) -> Self {
        Self {
            initial_state,
            spawned_at: 0.0,
            evolution: Some(Box::new(evolution)),
            on_apply: None,
        }
    }

    /// Spec for an inert entity: observations are no-ops.
    ///
    /// Mirrors traditionally-simulated entities that coexist with lazy
    /// ones without special-casing the registry.
    pub fn inert(initial_state: S) -> Self {
        Self {
            initial_state,
            spawned_at: 0.0,
            evolution: None,
            on_apply: None,
        }
    }

    /// Set the tick at which the entity enters the simulation.
    ///
    /// Must be finite; the first observation measures its gap from this
    /// value.
    #[must_use]
    pub const fn spawned_at(mut self, tick: Tick) -> Self {
        self.spawned_at = tick;
        self
    }

    /// Attach a presentation sink invoked on every reconstruction.
    #[must_use]
    pub fn with_apply(mut self, sink: impl ApplySink<S> + 'static) -> Self {
        self.on_apply = Some(Box::new(sink));
        self
    }
}

impl<S: fmt::Debug> fmt::Debug for RecordSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSpec")
            .field("initial_state", &self.initial_state)
            .field("spawned_at", &self.spawned_at)
            .field("lazy", &self.evolution.is_some())
            .field("has_apply", &self.on_apply.is_some())
            .finish()
    }
}

/// One entity's lazy state: the unit the registry owns and the engine
/// reconstructs.
pub struct StateRecord<S> {
    id: EntityId,
    state: S,
    last_observed: Tick,
    evolution: Option<Box<dyn Evolution<S>>>,
    on_apply: Option<Box<dyn ApplySink<S>>>,
}

impl<S> StateRecord<S> {
    /// Build a record from its registration spec. Registry-internal.
    pub(crate) fn new(id: EntityId, spec: RecordSpec<S>) -> Self {
        Self {
            id,
            state: spec.initial_state,
            last_observed: spec.spawned_at,
            evolution: spec.evolution,
            on_apply: spec.on_apply,
        }
    }

    /// The record's stable identity.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The state proven correct at [`last_observed`](Self::last_observed).
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// The tick at which the state was last proven correct.
    pub const fn last_observed(&self) -> Tick {
        self.last_observed
    }

    /// `true` if the record has no evolution function.
    pub const fn is_inert(&self) -> bool {
        self.evolution.is_none()
    }

    /// The evolution function, if the record is lazy. Engine-internal.
    pub(crate) fn evolution(&self) -> Option<&dyn Evolution<S>> {
        self.evolution.as_deref()
    }

    /// Push a reconstructed state to the sink, if one is attached.
    /// Engine-internal; called before [`commit`](Self::commit).
    pub(crate) fn push_to_sink(&mut self, state: &S) {
        if let Some(sink) = self.on_apply.as_mut() {
            sink.apply(state);
        }
    }

    /// Persist a new state and observation tick. Engine-internal: the
    /// only way a record's state or timestamp ever changes.
    pub(crate) fn commit(&mut self, state: S, tick: Tick) {
        self.state = state;
        self.last_observed = tick;
    }
}

impl<S: fmt::Debug> fmt::Debug for StateRecord<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRecord")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("last_observed", &self.last_observed)
            .field("lazy", &self.evolution.is_some())
            .finish()
    }
}
