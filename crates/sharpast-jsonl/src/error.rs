//! Error types for sharpast-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for sharpast-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single line could not be decoded. The line has been consumed and
    /// reading may continue with the next one.
    #[error("line {line_number}: {message}")]
    InvalidLine {
        /// The 1-based number of the offending line.
        line_number: usize,
        /// What was wrong with the line.
        message: String,
    },
}

impl Error {
    /// Returns `true` if the error concerns one line only.
    ///
    /// Line-level errors leave the reader positioned at the next line, so the
    /// caller can report them and keep going. Anything else means the stream
    /// itself is unusable.
    #[must_use]
    pub fn is_line_error(&self) -> bool {
        matches!(self, Self::InvalidLine { .. })
    }
}

/// A specialized Result type for sharpast-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
