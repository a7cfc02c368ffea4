//! Core error types for starfocus-core.
//!
//! Timer operations are infallible: their inputs are ticks and button presses
//! generated inside the process. The fallible edges are configuration and the
//! audio sink, and audio failures are swallowed at the mixing bus.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for starfocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Failures reported by an [`AudioSink`](crate::audio::AudioSink).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No output device or backend is present.
    #[error("audio output unavailable")]
    Unavailable,

    /// The output exists but is blocked until a user gesture resumes it.
    #[error("audio output suspended")]
    Suspended,
}
