//! Error types for the customers service.

use card_hash::CardHashError;
use thiserror::Error;
use uuid::Uuid;

/// Caller-supplied data that fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Card number is malformed or fails the Luhn checksum
    #[error("Invalid card number")]
    InvalidCardNumber,

    /// Expiry is not `MM/YYYY` with a month in 1..=12 and a positive year
    #[error("Invalid expiry date: expected MM/YYYY")]
    InvalidExpiryDate,

    /// CVV is not exactly three digits
    #[error("Invalid CVV: expected 3 digits")]
    InvalidCvv,

    /// A required text field is empty or whitespace
    #[error("Missing required field: {0}")]
    Blank(&'static str),
}

/// Errors returned by [`CustomerService`](crate::CustomerService).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    #[error("Card {card_id} not found for customer {customer_id}")]
    CardNotFound { customer_id: Uuid, card_id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A stored card record is corrupt. Distinct from a card that simply
    /// does not match.
    #[error("Card record {card_id} failed integrity check: {source}")]
    Integrity {
        card_id: Uuid,
        #[source]
        source: CardHashError,
    },
}

/// Errors loading the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
