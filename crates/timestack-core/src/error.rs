//! Core error types for timestack-core.
//!
//! Interactive timeline operations never fail; they degrade to "no event".
//! These errors only surface at the storage, configuration and text-parsing
//! boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timestack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Ledger storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ledger document storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read the ledger document
    #[error("Failed to read ledger at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the ledger document
    #[error("Failed to write ledger at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not determine where to keep data
    #[error("Data directory unavailable: {0}")]
    DataDirUnavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid minute range
    #[error("Invalid minute range: end ({end}) must be greater than start ({start}) and within 0..=1440")]
    InvalidMinuteRange { start: i64, end: i64 },

    /// Block id not present in the ledger
    #[error("Unknown block id: {0}")]
    UnknownBlock(u64),

    /// Inbox item id not present in the ledger
    #[error("Unknown inbox item: {0}")]
    UnknownInboxItem(String),

    /// Routine id not present in the ledger
    #[error("Unknown routine: {0}")]
    UnknownRoutine(String),

    /// Invalid "HH:MM" clock string
    #[error("Invalid clock time '{0}', expected HH:MM")]
    InvalidClock(String),

    /// Invalid YYYY-MM-DD date key
    #[error("Invalid date key '{0}', expected YYYY-MM-DD")]
    InvalidDateKey(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
