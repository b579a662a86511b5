//! Error types for the clock-wall binary.
//!
//! [`WallError`] is the top-level error type that wraps all failure
//! modes during startup and the frame loop, so `main` can propagate
//! everything with `?`.

/// Top-level error for the clock-wall binary.
#[derive(Debug, thiserror::Error)]
pub enum WallError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Wall registration failed.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: potentia_core::RegistryError,
    },
}
