//! Core error types for nextup-core.
//!
//! Nothing in the board engine itself is fatal: unresolvable recurrences and
//! malformed rules degrade to "not shown". These errors cover the edges
//! around it: reading reminder sources, configuration, and audio output.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for callers that load a board end to end: pick a source
/// from config, build a runtime, fetch.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reminder source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad input with a ready-made message
    #[error("{0}")]
    Custom(String),
}

/// Errors raised while fetching reminders and settings from a source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to read a source file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source content is not a valid board document
    #[error("Failed to parse board data: {0}")]
    Parse(#[from] serde_json::Error),

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Source location is not a usable URL
    #[error("Invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Source cannot serve data right now
    #[error("Source unavailable: {0}")]
    Unavailable(String),
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
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to determine or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Audio playback errors. Callers in the alert path swallow these.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The output refused or failed to play the sound
    #[error("Playback of '{sound}' failed: {message}")]
    Playback { sound: String, message: String },

    /// No output device is available
    #[error("No audio output available")]
    Unavailable,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
