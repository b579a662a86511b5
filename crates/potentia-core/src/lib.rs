//! Lazy state-reconstruction engine for the Potentia workspace.
//!
//! Entities tracked here are not simulated every tick. Each record holds
//! the state proven correct at its last observation plus a pure
//! evolution function; when something observes the entity, the engine
//! compresses the entire unsimulated gap into a single evolution call.
//! Same-tick deduplication guarantees the result is indistinguishable
//! from having run a per-tick simulation the whole time, no matter how
//! many observers ask.
//!
//! # Modules
//!
//! - [`record`] -- [`StateRecord`] and the [`Evolution`]/[`ApplySink`]
//!   contracts entities supply at registration time.
//! - [`registry`] -- [`Registry`], the sole owner of all records.
//! - [`observe`] -- The reconstruction engine: [`observe_one`] and
//!   [`observe_batch`].
//! - [`source`] -- The [`ObservationSource`] seam to the host's
//!   perception mechanism.
//! - [`snapshot`] -- Registry snapshot capture and restore.
//! - [`error`] -- [`RegistryError`] and [`ObserveError`].
//!
//! # Concurrency model
//!
//! Single-threaded, one tick at a time. The engine borrows the registry
//! mutably for the whole dedup-then-reconstruct sequence, so the
//! check-then-act step is atomic by construction -- there is no second
//! borrow that could race it.
//!
//! [`observe_one`]: observe::observe_one
//! [`observe_batch`]: observe::observe_batch

pub mod error;
pub mod observe;
pub mod record;
pub mod registry;
pub mod snapshot;
pub mod source;

pub use error::{ObserveError, RegistryError};
pub use observe::{observe_batch, observe_one};
pub use record::{ApplySink, Evolution, EvolveError, RecordSpec, StateRecord};
pub use registry::Registry;
pub use source::{ObservationSource, StubObservationSource, observe_from};
