//! Error types for cutlist.

use thiserror::Error;

/// Main error type for cutlist operations.
#[derive(Error, Debug)]
pub enum CutlistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Index {index} is out of range (playlist has {len} entries)")]
    Index { index: usize, len: usize },

    #[error("Playlist is empty")]
    EmptyPlaylist,

    #[error("Entry {index} has an invalid trim: out point {out_point}ns is not after in point {in_point}ns")]
    InvalidTrim {
        index: usize,
        in_point: u64,
        out_point: u64,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcoder error: {0}")]
    Transcoder(String),
}

/// Result type alias for cutlist operations.
pub type Result<T> = std::result::Result<T, CutlistError>;
