//! Card input and storage types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CardHashError;
use crate::salt::Salt;

/// Supported card networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Amex,
    Visa,
    MasterCard,
}

impl CardType {
    pub const ALL: [CardType; 3] = [CardType::Amex, CardType::Visa, CardType::MasterCard];

    /// Name used when the card type is stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Amex => "Amex",
            CardType::Visa => "Visa",
            CardType::MasterCard => "MasterCard",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = CardHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CardHashError::UnknownCardType(s.to_string()))
    }
}

/// Raw card data supplied by a caller for a single create or verify call.
///
/// Never persisted. The plaintext fields are wiped when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CardInput {
    #[zeroize(skip)]
    pub card_type: CardType,
    pub card_number: String,
    /// `MM/YYYY`
    pub expiry_date: String,
    pub cvv: String,
}

impl CardInput {
    pub fn new(
        card_type: CardType,
        card_number: impl Into<String>,
        expiry_date: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            card_type,
            card_number: card_number.into(),
            expiry_date: expiry_date.into(),
            cvv: cvv.into(),
        }
    }
}

impl fmt::Debug for CardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardInput")
            .field("card_type", &self.card_type)
            .field("card_number", &"<redacted>")
            .field("expiry_date", &"<redacted>")
            .field("cvv", &"<redacted>")
            .finish()
    }
}

/// Data to store in database for a card.
///
/// Every digest was derived with the salt stored on the same record; the
/// plaintext card data is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,
    /// Owning customer.
    pub customer_id: Uuid,
    /// Stored verbatim for display and filtering.
    pub card_type: CardType,
    /// Base64 PBKDF2 digest of the card number.
    pub card_number_digest: String,
    /// Base64 PBKDF2 digest of the `MM/YYYY` expiry.
    pub expiry_digest: String,
    /// Base64 PBKDF2 digest of the CVV.
    pub cvv_digest: String,
    /// Base64 encoding of the 16-byte salt.
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

impl CardRecord {
    /// Decode the stored salt.
    pub fn decode_salt(&self) -> crate::Result<Salt> {
        Salt::from_base64(&self.salt)
    }
}
