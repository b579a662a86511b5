//! Clock-wall host binary for the Potentia engine.
//!
//! Builds a wall of lazy clocks, then runs a frame loop in which a
//! pseudo-random sweep "looks at" a small window of the wall each
//! frame. Only the observed clocks are reconstructed; everything else
//! stays potential until the sweep lands on it, at which point the
//! whole unobserved gap is compressed into one evolution call.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `potentia-config.yaml`
//! 3. Seed clock faces from the local time of day
//! 4. Build the wall (lazy + painted clocks, display board)
//! 5. Run the frame loop with the sweep source
//! 6. Log the run summary

mod config;
mod error;
mod source;
mod wall;

use std::path::Path;
use std::time::Duration;

use chrono::Timelike;
use potentia_core::observe_from;
use potentia_types::Observation;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::WallConfig;
use crate::error::WallError;
use crate::source::SweepSource;

/// Application entry point for the clock wall.
///
/// # Errors
///
/// Returns an error if configuration loading or wall construction
/// fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("potentia-wall starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        lazy_count = config.wall.lazy_count,
        painted_count = config.wall.painted_count,
        frames = config.run.frames,
        window = config.observation.window,
        seed = config.observation.seed,
        "Configuration loaded"
    );

    // 3. Seed clock faces from the local time of day.
    let base_seconds = f64::from(chrono::Local::now().time().num_seconds_from_midnight());

    // 4. Build the wall.
    let mut wall = wall::build_wall(&config.wall, base_seconds).map_err(WallError::from)?;
    info!(clocks = wall.registry.len(), base_seconds, "Wall built");

    // 5. Run the frame loop.
    let mut sweep = SweepSource::new(
        wall.ids.clone(),
        config.observation.window,
        config.observation.seed,
    );
    let interval = Duration::from_millis(config.run.frame_interval_ms);

    let mut tick = 0.0;
    let mut reconstructed = 0_u64;
    let mut dedup_hits = 0_u64;
    let mut inert_hits = 0_u64;
    let mut failures = 0_u64;

    for _ in 0..config.run.frames {
        tick += 1.0;
        let results = observe_from(&mut wall.registry, &mut sweep, tick);
        for result in &results {
            match result {
                Ok(Observation::Reconstructed(_)) => {
                    reconstructed = reconstructed.saturating_add(1);
                }
                Ok(Observation::AlreadyCurrent) => {
                    dedup_hits = dedup_hits.saturating_add(1);
                }
                Ok(Observation::Inert) => {
                    inert_hits = inert_hits.saturating_add(1);
                }
                Ok(Observation::NotFound) => {}
                Err(error) => {
                    failures = failures.saturating_add(1);
                    warn!(%error, tick, "observation failed");
                }
            }
        }
        debug!(tick, observed = results.len(), "frame complete");

        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    // 6. Log the run summary.
    info!(
        frames = config.run.frames,
        reconstructed,
        dedup_hits,
        inert_hits,
        failures,
        redraws = wall.board.borrow().redraws(),
        "Wall run complete"
    );

    Ok(())
}

/// Load configuration from `potentia-config.yaml`, falling back to
/// defaults when the file does not exist.
fn load_config() -> Result<WallConfig, WallError> {
    let config_path = Path::new("potentia-config.yaml");
    if config_path.exists() {
        Ok(WallConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(WallConfig::default())
    }
}
