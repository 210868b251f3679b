//! Error types for the workout_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
///
/// The session state machine itself never produces these; they come from the
/// I/O edges (key-value store, history log, catalog and config loading).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exercise catalog failed schema validation
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// A set entered by the user is outside the accepted ranges
    #[error("Invalid set: {0}")]
    InvalidSet(String),

    /// Key-value store error
    #[error("Store error: {0}")]
    Store(String),
}
