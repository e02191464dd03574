//! Error types for parsing and loading operations.
//!
//! Validation faults are not errors; they are [`ErrorCode`](crate::ErrorCode)
//! annotations on sections. These variants only surface from the standalone
//! parsing and loading functions.

use thiserror::Error;

/// Errors returned by parsing and table-loading functions.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A time range was not in canonical `HH:MM-HH:MM` form.
    #[error("Invalid time range: {0}")]
    InvalidTime(String),

    /// A weekday code outside {M,T,W,R,F,S,U}.
    #[error("Invalid weekday code: {0}")]
    InvalidDay(String),

    /// A calendar date in neither `YYYY-MM-DD` nor `MM/DD/YYYY` form.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A finals grid table with a malformed or duplicated row.
    #[error("Invalid finals grid row {row}: {message}")]
    InvalidGrid { row: usize, message: String },

    /// A validation setting outside its allowed range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// JSON input (config, grid, capacities) failed to deserialize.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout finals-engine.
pub type Result<T> = std::result::Result<T, EngineError>;
