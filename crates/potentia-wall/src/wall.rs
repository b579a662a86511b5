//! The clock wall: the reference domain for lazy reconstruction.
//!
//! Each lazy clock's state is a single accumulated seconds count -- the
//! minimal sufficient statistic for continuing evolution. The evolution
//! function is a pure accumulator (`new = old + elapsed`), so observing
//! a clock after an arbitrarily long gap yields exactly what per-frame
//! simulation would have. The expensive part -- decomposing seconds into
//! an hours/minutes/seconds dial face -- happens only in the apply sink,
//! and the display board is rewritten only when the face actually
//! changes.
//!
//! A few "painted" clocks are mixed into the wall: inert records whose
//! faces are set once at build time and never move. Observing one is a
//! no-op.

use std::cell::RefCell;
use std::rc::Rc;

use potentia_core::{EvolveError, RecordSpec, Registry, RegistryError};
use potentia_types::{EntityId, Tick};

use crate::config::WallSection;

/// Seconds in one display day; dial faces wrap at this boundary.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// A lazy clock's simulated state: seconds accumulated since its spawn
/// reference. Monotonic; wrapping happens only at display time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockState {
    /// Accumulated seconds.
    pub seconds: f64,
}

/// Evolve a clock across an unsimulated gap: pure accumulation.
pub fn evolve_clock(state: &ClockState, elapsed: Tick) -> Result<ClockState, EvolveError> {
    Ok(ClockState {
        seconds: state.seconds + elapsed,
    })
}

/// A dial face: the derived hours/minutes/seconds decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialReading {
    /// Hour hand, 0..24.
    pub hours: u32,
    /// Minute hand, 0..60.
    pub minutes: u32,
    /// Second hand, 0..60.
    pub seconds: u32,
}

impl DialReading {
    /// Decompose a clock state into a dial face, wrapping at 24 hours.
    pub fn from_state(state: &ClockState) -> Self {
        let wrapped = state.seconds.rem_euclid(SECONDS_PER_DAY);
        // rem_euclid keeps the value in [0, 86_400); the cast cannot
        // truncate meaningfully or go negative.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = wrapped.floor() as u32 % 86_400;
        Self {
            hours: whole / 3_600,
            minutes: (whole % 3_600) / 60,
            seconds: whole % 60,
        }
    }
}

impl core::fmt::Display for DialReading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// The presentation side of the wall: one dial slot per clock.
///
/// `update` skips redundant rewrites -- a reconstruction that lands on
/// the same face costs nothing on the display side. The redraw counter
/// exists so the host can report how much presentation work the run
/// actually did.
#[derive(Debug)]
pub struct DisplayBoard {
    dials: Vec<Option<DialReading>>,
    redraws: u64,
}

impl DisplayBoard {
    /// Create a board with the given number of empty dial slots.
    pub fn new(slots: usize) -> Self {
        Self {
            dials: vec![None; slots],
            redraws: 0,
        }
    }

    /// Write a dial face into a slot. Returns `true` if the face
    /// changed and a redraw happened; unknown slots are ignored.
    pub fn update(&mut self, slot: usize, reading: DialReading) -> bool {
        let Some(dial) = self.dials.get_mut(slot) else {
            return false;
        };
        if dial.as_ref() == Some(&reading) {
            return false;
        }
        *dial = Some(reading);
        self.redraws = self.redraws.saturating_add(1);
        true
    }

    /// Read the face currently shown in a slot.
    pub fn dial(&self, slot: usize) -> Option<DialReading> {
        self.dials.get(slot).copied().flatten()
    }

    /// Total number of dial rewrites since the board was created.
    pub const fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Number of dial slots.
    pub fn slots(&self) -> usize {
        self.dials.len()
    }
}

/// A built wall: the registry of clocks, the shared display board, and
/// every clock id in slot order (lazy first, painted after).
pub struct Wall {
    /// The registry owning all clock records.
    pub registry: Registry<ClockState>,
    /// The display board the apply sinks write to.
    pub board: Rc<RefCell<DisplayBoard>>,
    /// All clock ids, in slot order.
    pub ids: Vec<EntityId>,
}

impl core::fmt::Debug for Wall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wall")
            .field("clocks", &self.ids.len())
            .field("board", &self.board)
            .finish()
    }
}

/// Build the wall from configuration.
///
/// Lazy clocks are staggered one second apart from `base_seconds` so
/// the wall shows a spread of faces. Painted clocks are registered as
/// inert records and their faces written once, here.
///
/// # Errors
///
/// Returns [`RegistryError`] if registration fails.
pub fn build_wall(config: &WallSection, base_seconds: f64) -> Result<Wall, RegistryError> {
    let total = config.lazy_count.saturating_add(config.painted_count);
    let board = Rc::new(RefCell::new(DisplayBoard::new(total)));
    let mut registry = Registry::new();
    let mut ids = Vec::with_capacity(total);

    let mut slot = 0_usize;
    let mut offset = 0.0;
    let lazy_ids = registry.register_batch(config.lazy_count, |_| {
        let sink_board = Rc::clone(&board);
        let sink_slot = slot;
        slot = slot.saturating_add(1);
        let state = ClockState {
            seconds: base_seconds + offset,
        };
        offset += 1.0;
        RecordSpec::lazy(state, evolve_clock).with_apply(move |state: &ClockState| {
            sink_board
                .borrow_mut()
                .update(sink_slot, DialReading::from_state(state));
        })
    })?;
    ids.extend(lazy_ids);

    let painted_state = ClockState {
        seconds: base_seconds,
    };
    let painted_ids =
        registry.register_batch(config.painted_count, |_| RecordSpec::inert(painted_state))?;
    for id in painted_ids {
        // Painted faces are set once and never move.
        board
            .borrow_mut()
            .update(slot, DialReading::from_state(&painted_state));
        slot = slot.saturating_add(1);
        ids.push(id);
    }

    Ok(Wall {
        registry,
        board,
        ids,
    })
}
