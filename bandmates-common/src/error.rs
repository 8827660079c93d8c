//! Common error types for bandmates

use thiserror::Error;

/// Common result type for bandmates operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the bandmates crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON input or output failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tabular export failed while writing to its sink
    #[error("Export error: {0}")]
    Export(String),
}
