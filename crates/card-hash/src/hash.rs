//! PBKDF2-HMAC-SHA256 digests for card fields.

use data_encoding::BASE64;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::config::{DIGEST_LEN, KDF_ITERATIONS};
use crate::salt::Salt;

/// Derives a one-way, salt-bound digest from a single card field.
///
/// Implementations must be deterministic for a given `(value, salt)` pair,
/// otherwise stored records can never be verified.
pub trait CardHasher: Send + Sync {
    /// Derive the base64-encoded digest of `value` under `salt`.
    ///
    /// # Panics
    /// If `value` is empty. Card fields are validated upstream, so an empty
    /// value here is a bug in the caller.
    fn derive_digest(&self, value: &str, salt: &Salt) -> String;
}

/// The canonical hasher: PBKDF2-HMAC-SHA256, 100,000 rounds, 32-byte output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2Hasher;

impl CardHasher for Pbkdf2Hasher {
    fn derive_digest(&self, value: &str, salt: &Salt) -> String {
        assert!(
            !value.is_empty(),
            "cannot derive a digest from an empty card field"
        );

        let mut output = [0u8; DIGEST_LEN];
        pbkdf2_hmac::<Sha256>(value.as_bytes(), salt.as_bytes(), KDF_ITERATIONS, &mut output);

        BASE64.encode(&output)
    }
}

/// Derive a digest with the canonical [`Pbkdf2Hasher`].
pub fn derive_digest(value: &str, salt: &Salt) -> String {
    Pbkdf2Hasher.derive_digest(value, salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salt(byte: u8) -> Salt {
        Salt::from_slice(&[byte; 16]).unwrap()
    }

    #[test]
    fn test_digest_output_size() {
        let digest = derive_digest("4111111111111111", &salt(1));
        // 32 bytes -> 44 base64 chars (with padding)
        assert_eq!(digest.len(), 44);
        assert_eq!(BASE64.decode(digest.as_bytes()).unwrap().len(), DIGEST_LEN);
    }

    #[test]
    fn test_digest_deterministic() {
        let digest1 = derive_digest("123", &salt(1));
        let digest2 = derive_digest("123", &salt(1));
        assert_eq!(digest1, digest2);
    }

    #[test]
    fn test_digest_changes_with_salt() {
        let digest1 = derive_digest("123", &salt(1));
        let digest2 = derive_digest("123", &salt(2));
        assert_ne!(digest1, digest2);
    }

    #[test]
    fn test_digest_changes_with_value() {
        let digest1 = derive_digest("123", &salt(1));
        let digest2 = derive_digest("124", &salt(1));
        assert_ne!(digest1, digest2);
    }

    #[test]
    fn test_digest_hides_value() {
        let digest = derive_digest("01/2030", &salt(1));
        assert!(!digest.contains("2030"));
    }

    #[test]
    #[should_panic(expected = "empty card field")]
    fn test_empty_value_panics() {
        derive_digest("", &salt(1));
    }
}
