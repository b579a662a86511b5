//! Configuration loading for the clock-wall host.
//!
//! The canonical configuration lives in `potentia-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and a loader that reads the file, falling back to
//! defaults when it is absent.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration for the clock-wall run.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WallConfig {
    /// Wall composition (how many clocks, and of which kind).
    #[serde(default)]
    pub wall: WallSection,

    /// Run boundaries and pacing.
    #[serde(default)]
    pub run: RunSection,

    /// Observation sweep parameters.
    #[serde(default)]
    pub observation: ObservationSection,
}

impl WallConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Wall composition settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WallSection {
    /// Number of lazy clocks on the wall.
    #[serde(default = "default_lazy_count")]
    pub lazy_count: usize,

    /// Number of painted (inert) clocks mixed in. Painted clocks never
    /// change; observing one is a no-op.
    #[serde(default = "default_painted_count")]
    pub painted_count: usize,
}

impl Default for WallSection {
    fn default() -> Self {
        Self {
            lazy_count: default_lazy_count(),
            painted_count: default_painted_count(),
        }
    }
}

const fn default_lazy_count() -> usize {
    64
}

const fn default_painted_count() -> usize {
    4
}

/// Run boundary and pacing settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunSection {
    /// Number of frames to run before stopping.
    #[serde(default = "default_frames")]
    pub frames: u64,

    /// Wall-clock pause between frames, in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

const fn default_frames() -> u64 {
    120
}

const fn default_frame_interval_ms() -> u64 {
    50
}

/// Observation sweep settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObservationSection {
    /// How many clocks the sweep perceives each frame.
    #[serde(default = "default_window")]
    pub window: usize,

    /// RNG seed for the sweep, so runs are reproducible.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ObservationSection {
    fn default() -> Self {
        Self {
            window: default_window(),
            seed: default_seed(),
        }
    }
}

const fn default_window() -> usize {
    8
}

const fn default_seed() -> u64 {
    42
}
