//! Error types for Shake.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Shake operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Shake.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Sample data errors (20-29)
    #[error("sample acquisition failed: {0}")]
    Acquisition(String),

    #[error("malformed sample row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("measurement session already flushed")]
    AlreadyFlushed,

    // Flush errors (30-39)
    #[error("failed to launch flush worker: {0}")]
    FlushLaunch(String),

    // Motion errors (40-49)
    #[error("invalid excitation size: {0}")]
    InvalidSize(f64),

    #[error("waypoint out of bounds on {axis}: {value:.3} not in [{min:.3}, {max:.3}]")]
    OutOfBounds {
        axis: char,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown direction: {0}")]
    UnknownDirection(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Acquisition(_) => 20,
            Error::MalformedRow { .. } => 21,
            Error::AlreadyFlushed => 22,
            Error::FlushLaunch(_) => 30,
            Error::InvalidSize(_) => 40,
            Error::OutOfBounds { .. } => 41,
            Error::UnknownDirection(_) => 42,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::FileNotFound(_) => 62,
        }
    }
}
