//! Card verification with constant-time comparison.

use subtle::{Choice, ConstantTimeEq};

use crate::data::{CardInput, CardRecord};
use crate::error::{CardHashError, Result};
use crate::hash::CardHasher;
use crate::transform::CardTransformer;

impl<H: CardHasher> CardTransformer<H> {
    /// Verify candidate card data against a stored record.
    ///
    /// This function:
    /// 1. Decodes the record's own salt (never a fresh one)
    /// 2. Derives digests for the candidate's number, expiry and CVV
    /// 3. Compares all three against the stored digests in constant time
    ///
    /// # Returns
    /// * `Ok(true)` if every field matches
    /// * `Ok(false)` if any field differs
    /// * `Err` if the stored record is corrupt (bad salt, missing digest)
    pub fn verify(&self, candidate: &CardInput, existing: &CardRecord) -> Result<bool> {
        let salt = existing.decode_salt().inspect_err(|e| {
            log::warn!("Card record {} has an unusable salt: {}", existing.id, e);
        })?;
        check_digests_present(existing)?;

        let computed = self.field_digests(candidate, &salt);

        // No short-circuit: every field is compared
        let matched = digests_equal(&computed.card_number, &existing.card_number_digest)
            & digests_equal(&computed.expiry, &existing.expiry_digest)
            & digests_equal(&computed.cvv, &existing.cvv_digest);

        Ok(matched.into())
    }
}

fn check_digests_present(record: &CardRecord) -> Result<()> {
    let fields = [
        ("card_number_digest", &record.card_number_digest),
        ("expiry_digest", &record.expiry_digest),
        ("cvv_digest", &record.cvv_digest),
    ];

    for (name, digest) in fields {
        if digest.is_empty() {
            log::warn!("Card record {} is missing {}", record.id, name);
            return Err(CardHashError::MissingDigest(name));
        }
    }

    Ok(())
}

/// Constant-time comparison of two encoded digests.
fn digests_equal(a: &str, b: &str) -> Choice {
    a.as_bytes().ct_eq(b.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CardType;
    use rand::rngs::OsRng;
    use uuid::Uuid;

    fn visa() -> CardInput {
        CardInput::new(CardType::Visa, "4111111111111111", "01/2030", "123")
    }

    #[test]
    fn test_verify_valid_card() {
        let transformer = CardTransformer::new();
        let record = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);

        let result = transformer.verify(&visa(), &record).unwrap();
        assert!(result);
    }

    #[test]
    fn test_verify_wrong_cvv() {
        let transformer = CardTransformer::new();
        let record = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);

        let candidate = CardInput::new(CardType::Visa, "4111111111111111", "01/2030", "124");
        let result = transformer.verify(&candidate, &record).unwrap();
        assert!(!result);
    }

    #[test]
    fn test_verify_tampered_digest() {
        let transformer = CardTransformer::new();
        let mut record = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);

        // Swap two digests so every field is still a well-formed digest
        std::mem::swap(&mut record.card_number_digest, &mut record.cvv_digest);

        let result = transformer.verify(&visa(), &record).unwrap();
        assert!(!result);
    }

    #[test]
    fn test_verify_invalid_salt_encoding() {
        let transformer = CardTransformer::new();
        let mut record = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);
        record.salt = "%%%".to_string();

        let result = transformer.verify(&visa(), &record);
        assert_eq!(result, Err(CardHashError::InvalidSaltEncoding));
    }

    #[test]
    fn test_verify_short_salt() {
        let transformer = CardTransformer::new();
        let mut record = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);
        record.salt = "AQEBAQEBAQE=".to_string();

        let result = transformer.verify(&visa(), &record);
        assert_eq!(
            result,
            Err(CardHashError::InvalidSaltLength {
                expected: 16,
                got: 8
            })
        );
    }

    #[test]
    fn test_verify_missing_digest() {
        let transformer = CardTransformer::new();
        let mut record = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);
        record.expiry_digest.clear();

        let result = transformer.verify(&visa(), &record);
        assert_eq!(result, Err(CardHashError::MissingDigest("expiry_digest")));
    }

    #[test]
    fn test_digests_equal_length_mismatch() {
        assert!(!bool::from(digests_equal("abc", "abcd")));
        assert!(bool::from(digests_equal("abc", "abc")));
    }
}
