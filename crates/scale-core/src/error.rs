//! Error types for the scale core.

use thiserror::Error;

/// Errors that can occur while decoding wire values or tokens.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("element data has odd length {0}")]
    OddElementData(usize),

    #[error("unknown byte order: {0}")]
    UnknownEndian(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
