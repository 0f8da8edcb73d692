use std::io;
use thiserror::Error;

/// Result type for loaf operations
pub type Result<T> = std::result::Result<T, LoafError>;

/// Unified error type for all pipeline stages
#[derive(Debug, Error)]
pub enum LoafError {
    // Envelope errors
    #[error("Invalid envelope format: {0}")]
    InvalidEnvelope(String),

    // Hex errors
    #[error("Hex payload has odd length: {0}")]
    OddHexLength(usize),

    #[error("Invalid hex payload: {0}")]
    InvalidHex(String),

    // Compression errors
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    // Container errors
    #[error("Entry too large for container header: {0} bytes")]
    EntryTooLarge(u64),

    #[error("Modification time does not fit container header: {0}")]
    TimestampOutOfRange(u64),

    // Input errors
    #[error("Input unavailable: {0}")]
    InputUnavailable(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<toml::de::Error> for LoafError {
    fn from(err: toml::de::Error) -> Self {
        LoafError::Config(err.to_string())
    }
}

impl From<hex::FromHexError> for LoafError {
    fn from(err: hex::FromHexError) -> Self {
        LoafError::InvalidHex(err.to_string())
    }
}
