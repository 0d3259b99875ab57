//! Per-record salt generation and encoding.

use data_encoding::BASE64;
use rand::{CryptoRng, RngCore};

use crate::config::SALT_LEN;
use crate::error::{CardHashError, Result};

/// A 16-byte salt owned by exactly one card record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Generate a new salt whose bytes are all non-zero.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SALT_LEN];
        rng.fill_bytes(&mut bytes);

        // Redraw zero bytes individually
        for byte in bytes.iter_mut() {
            while *byte == 0 {
                *byte = (rng.next_u32() & 0xFF) as u8;
            }
        }

        Salt(bytes)
    }

    /// Build a salt from raw bytes, rejecting anything that is not 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SALT_LEN] =
            bytes
                .try_into()
                .map_err(|_| CardHashError::InvalidSaltLength {
                    expected: SALT_LEN,
                    got: bytes.len(),
                })?;
        Ok(Salt(array))
    }

    /// Decode a stored base64 salt.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| CardHashError::InvalidSaltEncoding)?;
        Self::from_slice(&bytes)
    }

    /// Encode the salt for storage.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

/// Generate a fresh salt from `rng`.
pub fn generate_salt<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Salt {
    Salt::generate(rng)
}
