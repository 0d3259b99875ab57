//! Salted, one-way tokenization of payment-card data.
//!
//! This crate provides functionality for:
//! - Generating per-record salts from an injected secure random source
//! - Deriving slow, salt-bound digests of card fields (PBKDF2-HMAC-SHA256)
//! - Turning raw card input into a storable [`CardRecord`] and verifying
//!   candidate card data against it using constant-time comparison
//!
//! # Record Format
//!
//! A record stores the card type verbatim, one base64 digest per sensitive
//! field (number, expiry, CVV) and the base64 salt that produced them.
//! The plaintext never leaves the [`CardInput`] it came from.
//!
//! # Security Features
//!
//! - 100,000 PBKDF2 iterations per field to deter offline brute force
//! - A fresh 16-byte salt per record, rotated on every rewrite
//! - Constant-time digest comparison
//! - Memory zeroization of card plaintext after use
//!
//! # Example
//!
//! ```rust
//! use card_hash::{CardInput, CardTransformer, CardType};
//! use rand::rngs::OsRng;
//! use uuid::Uuid;
//!
//! let transformer = CardTransformer::new();
//! let input = CardInput::new(CardType::Visa, "4111111111111111", "01/2030", "123");
//!
//! // Hash the card and store the record in your database...
//! let record = transformer.create_record(Uuid::now_v7(), &input, &mut OsRng);
//!
//! // Later, check that a caller really knows the card
//! let owned = transformer.verify(&input, &record).unwrap();
//! assert!(owned);
//! ```

mod config;
mod data;
mod error;
mod hash;
mod salt;
mod transform;
mod verify;

// Public re-exports
pub use config::{DIGEST_LEN, KDF_ALGORITHM, KDF_ITERATIONS, KdfParams, SALT_LEN};
pub use data::{CardInput, CardRecord, CardType};
pub use error::{CardHashError, Result};
pub use hash::{CardHasher, Pbkdf2Hasher, derive_digest};
pub use salt::{Salt, generate_salt};
pub use transform::CardTransformer;
