//! Error types for the gradient grid.

use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum GridError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid color {0:?}: expected #rrggbb or #rgb")]
    InvalidColor(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GridError>;
