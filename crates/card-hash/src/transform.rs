//! Card record creation and salt rotation.

use chrono::Utc;
use rand::{CryptoRng, RngCore};
use uuid::Uuid;

use crate::data::{CardInput, CardRecord};
use crate::hash::{CardHasher, Pbkdf2Hasher};
use crate::salt::Salt;

/// Digests of the three sensitive card fields under one salt.
pub(crate) struct FieldDigests {
    pub(crate) card_number: String,
    pub(crate) expiry: String,
    pub(crate) cvv: String,
}

/// Turns raw [`CardInput`] into storable [`CardRecord`]s and back-checks them.
///
/// Stateless: one transformer can be shared across threads.
#[derive(Debug, Clone)]
pub struct CardTransformer<H = Pbkdf2Hasher> {
    hasher: H,
}

impl CardTransformer<Pbkdf2Hasher> {
    /// Transformer backed by the canonical PBKDF2 hasher.
    pub fn new() -> Self {
        Self {
            hasher: Pbkdf2Hasher,
        }
    }
}

impl Default for CardTransformer<Pbkdf2Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CardHasher> CardTransformer<H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Hash a card into a new record for `customer_id`.
    ///
    /// Every call draws a fresh salt, so hashing the same card twice yields
    /// two unrelated records. The record is not persisted.
    pub fn create_record<R: RngCore + CryptoRng + ?Sized>(
        &self,
        customer_id: Uuid,
        input: &CardInput,
        rng: &mut R,
    ) -> CardRecord {
        self.create_record_with_salt(customer_id, input, Salt::generate(rng))
    }

    /// Hash a card into a new record under a salt the caller already drew.
    ///
    /// The salt must be fresh; it becomes owned by the returned record.
    pub fn create_record_with_salt(
        &self,
        customer_id: Uuid,
        input: &CardInput,
        salt: Salt,
    ) -> CardRecord {
        let digests = self.field_digests(input, &salt);

        CardRecord {
            id: Uuid::now_v7(),
            customer_id,
            card_type: input.card_type,
            card_number_digest: digests.card_number,
            expiry_digest: digests.expiry,
            cvv_digest: digests.cvv,
            salt: salt.to_base64(),
            created_at: Utc::now(),
        }
    }

    /// Rehash `previous` with new card data.
    ///
    /// The salt is always rotated; `previous.salt` is never reused. Identity,
    /// owner and creation time carry over.
    pub fn update_record<R: RngCore + CryptoRng + ?Sized>(
        &self,
        input: &CardInput,
        previous: &CardRecord,
        rng: &mut R,
    ) -> CardRecord {
        self.update_record_with_salt(input, previous, Salt::generate(rng))
    }

    /// [`update_record`](Self::update_record) with a pre-drawn salt.
    pub fn update_record_with_salt(
        &self,
        input: &CardInput,
        previous: &CardRecord,
        salt: Salt,
    ) -> CardRecord {
        let fresh = self.create_record_with_salt(previous.customer_id, input, salt);

        CardRecord {
            id: previous.id,
            created_at: previous.created_at,
            ..fresh
        }
    }

    pub(crate) fn field_digests(&self, input: &CardInput, salt: &Salt) -> FieldDigests {
        FieldDigests {
            card_number: self.hasher.derive_digest(&input.card_number, salt),
            expiry: self.hasher.derive_digest(&input.expiry_date, salt),
            cvv: self.hasher.derive_digest(&input.cvv, salt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CardType;
    use rand::SeedableRng;
    use rand::rngs::{OsRng, StdRng};

    fn visa() -> CardInput {
        CardInput::new(CardType::Visa, "4111111111111111", "01/2030", "123")
    }

    #[test]
    fn test_create_record_populates_every_field() {
        let transformer = CardTransformer::new();
        let customer_id = Uuid::new_v4();
        let record = transformer.create_record(customer_id, &visa(), &mut OsRng);

        assert_eq!(record.customer_id, customer_id);
        assert_eq!(record.card_type, CardType::Visa);
        assert!(!record.card_number_digest.is_empty());
        assert!(!record.expiry_digest.is_empty());
        assert!(!record.cvv_digest.is_empty());
        assert_eq!(record.decode_salt().unwrap().as_bytes().len(), 16);
    }

    #[test]
    fn test_create_record_hashes_expiry() {
        let transformer = CardTransformer::new();
        let record = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);

        assert_ne!(record.expiry_digest, "01/2030");
        let salt = record.decode_salt().unwrap();
        assert_eq!(
            record.expiry_digest,
            transformer.hasher().derive_digest("01/2030", &salt)
        );
    }

    #[test]
    fn test_create_record_unique_salts() {
        let transformer = CardTransformer::new();
        let customer_id = Uuid::new_v4();
        let record1 = transformer.create_record(customer_id, &visa(), &mut OsRng);
        let record2 = transformer.create_record(customer_id, &visa(), &mut OsRng);

        assert_ne!(record1.id, record2.id);
        assert_ne!(record1.salt, record2.salt);
        assert_ne!(record1.card_number_digest, record2.card_number_digest);
        assert_ne!(record1.expiry_digest, record2.expiry_digest);
        assert_ne!(record1.cvv_digest, record2.cvv_digest);
    }

    #[test]
    fn test_create_record_seeded_rng_reproduces_digests() {
        let transformer = CardTransformer::new();
        let customer_id = Uuid::new_v4();
        let record1 =
            transformer.create_record(customer_id, &visa(), &mut StdRng::seed_from_u64(42));
        let record2 =
            transformer.create_record(customer_id, &visa(), &mut StdRng::seed_from_u64(42));

        assert_eq!(record1.salt, record2.salt);
        assert_eq!(record1.card_number_digest, record2.card_number_digest);
    }

    #[test]
    fn test_update_record_keeps_identity_and_rotates_salt() {
        let transformer = CardTransformer::new();
        let previous = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);

        let replacement = CardInput::new(CardType::MasterCard, "5555555555554444", "02/2031", "456");
        let updated = transformer.update_record(&replacement, &previous, &mut OsRng);

        assert_eq!(updated.id, previous.id);
        assert_eq!(updated.customer_id, previous.customer_id);
        assert_eq!(updated.created_at, previous.created_at);
        assert_eq!(updated.card_type, CardType::MasterCard);
        assert_ne!(updated.salt, previous.salt);
        assert_ne!(updated.card_number_digest, previous.card_number_digest);
    }

    #[test]
    fn test_create_record_with_salt_matches_rng_path() {
        let transformer = CardTransformer::new();
        let customer_id = Uuid::new_v4();
        let salt = Salt::generate(&mut StdRng::seed_from_u64(7));

        let drawn =
            transformer.create_record(customer_id, &visa(), &mut StdRng::seed_from_u64(7));
        let given = transformer.create_record_with_salt(customer_id, &visa(), salt);

        assert_eq!(given.salt, salt.to_base64());
        assert_eq!(given.salt, drawn.salt);
        assert_eq!(given.card_number_digest, drawn.card_number_digest);
        assert_eq!(given.expiry_digest, drawn.expiry_digest);
        assert_eq!(given.cvv_digest, drawn.cvv_digest);
    }

    #[test]
    fn test_update_record_with_salt_uses_given_salt() {
        let transformer = CardTransformer::new();
        let previous = transformer.create_record(Uuid::new_v4(), &visa(), &mut OsRng);
        let salt = Salt::generate(&mut StdRng::seed_from_u64(11));

        let updated = transformer.update_record_with_salt(&visa(), &previous, salt);

        assert_eq!(updated.id, previous.id);
        assert_eq!(updated.created_at, previous.created_at);
        assert_eq!(updated.salt, salt.to_base64());
        assert_ne!(updated.salt, previous.salt);
    }
}
