//! Error types for notebox.

use thiserror::Error;

/// Result type alias using notebox's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notebox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// Invalid input (missing fields, malformed file name, bad paging)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload exceeds the configured per-file limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the variants that mean "the thing asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::NoteNotFound(_))
    }
}
