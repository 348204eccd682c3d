//! Core error types for ringtimer-core.
//!
//! Every failure in the timer subsystem is recoverable: an invalid duration is
//! rejected with visible feedback, an unavailable capability degrades silently.
//! Illegal state transitions are not errors at all; the engine returns `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ringtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A best-effort host capability (e.g. keeping the display awake) could not be acquired
    #[error("Capability unavailable: {capability}: {message}")]
    CapabilityUnavailable { capability: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Zero duration where a positive one is required
    #[error("Invalid duration for {target}: must be greater than zero")]
    InvalidDuration { target: String },

    /// Picker value read before the user confirmed it
    #[error("Picker '{picker}' has not been confirmed")]
    Unconfirmed { picker: String },

    /// Value outside the accepted range
    #[error("Value {value} for '{field}' is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: u32,
        min: u32,
        max: u32,
    },
}

impl ValidationError {
    pub fn invalid_duration(target: impl Into<String>) -> Self {
        ValidationError::InvalidDuration {
            target: target.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
