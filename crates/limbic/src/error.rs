//! Error types for Limbic

use thiserror::Error;

/// Main error type for Limbic operations
#[derive(Error, Debug)]
pub enum LimbicError {
    /// Storage-related errors (partition handling, lock poisoning, etc.)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Embedding generation errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed caller input, rejected at the facade boundary
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Limbic operations
pub type Result<T> = std::result::Result<T, LimbicError>;
