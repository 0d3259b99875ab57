//! Error types for card hashing operations.

use thiserror::Error;

/// Errors raised when stored card data cannot be trusted.
///
/// A wrong card is not an error: [`verify`](crate::CardTransformer::verify)
/// reports it as `Ok(false)`. These variants mean the stored record itself is
/// corrupt or has been tampered with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardHashError {
    /// Stored salt is not valid base64
    #[error("Invalid salt encoding")]
    InvalidSaltEncoding,

    /// Stored salt decodes to the wrong number of bytes
    #[error("Invalid salt length: expected {expected} bytes, got {got}")]
    InvalidSaltLength { expected: usize, got: usize },

    /// A digest field of the stored record is empty
    #[error("Missing digest: {0}")]
    MissingDigest(&'static str),

    /// Stored card type is not one of the known card types
    #[error("Unknown card type: {0}")]
    UnknownCardType(String),
}

/// Result type alias for card hashing operations.
pub type Result<T> = std::result::Result<T, CardHashError>;
