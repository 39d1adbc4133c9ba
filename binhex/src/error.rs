//! Error types for the encoder

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EncodeError>;

#[derive(Debug, Error)]
pub enum EncodeError {
    /// Layout tag outside 1, 2 or 3.
    #[error("invalid layout `{0}`: specify infile format 1, 2, or 3")]
    InvalidLayout(String),

    #[error("chunk at ${origin:04X} is missing its length word")]
    MissingLength { origin: u16 },

    #[error("chunk at ${origin:04X} truncated: expected {expected} bytes, found {found}")]
    TruncatedChunk { origin: u16, expected: u16, found: usize },

    #[error("encoding cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// True for errors raised before any input was read.
    pub fn is_config(&self) -> bool {
        matches!(self, EncodeError::InvalidLayout(_))
    }
}
