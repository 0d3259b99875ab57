//! Customer and card operations over the store and the hashing core.

use std::sync::Mutex;

use card_hash::{CardHasher, CardInput, CardRecord, CardTransformer, Pbkdf2Hasher, Salt};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::model::{Customer, NewCustomer};
use crate::store::CustomerStore;
use crate::validate::{prepare_card, validate_customer};

/// Customer and card management.
///
/// Card data is validated, hashed with a per-record salt drawn from the
/// injected RNG, and only then handed to the store.
pub struct CustomerService<H = Pbkdf2Hasher, R = OsRng> {
    store: CustomerStore,
    transformer: CardTransformer<H>,
    rng: Mutex<R>,
}

impl CustomerService {
    /// Service using the canonical PBKDF2 hasher and the OS random source.
    pub fn new(store: CustomerStore) -> Self {
        Self::with_parts(store, CardTransformer::new(), OsRng)
    }
}

impl<H: CardHasher, R: RngCore + CryptoRng> CustomerService<H, R> {
    pub fn with_parts(store: CustomerStore, transformer: CardTransformer<H>, rng: R) -> Self {
        Self {
            store,
            transformer,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &CustomerStore {
        &self.store
    }

    // ------------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------------

    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        Ok(self.store.list_customers()?)
    }

    pub fn get_customer(&self, id: Uuid) -> Result<Customer> {
        self.store
            .get_customer(id)?
            .ok_or(ServiceError::CustomerNotFound(id))
    }

    pub fn create_customer(&self, new: NewCustomer) -> Result<Customer> {
        validate_customer(&new)?;
        let customer = new.into_customer();
        self.store.insert_customer(&customer)?;
        log::info!("Created customer {}", customer.id);
        Ok(customer)
    }

    /// Replace name and address. Date of birth is fixed at creation.
    pub fn update_customer(&self, id: Uuid, changes: NewCustomer) -> Result<Customer> {
        validate_customer(&changes)?;
        if !self
            .store
            .update_customer(id, &changes.name, &changes.address)?
        {
            return Err(ServiceError::CustomerNotFound(id));
        }
        self.get_customer(id)
    }

    /// Delete a customer together with all of their cards.
    pub fn delete_customer(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_customer(id)? {
            return Err(ServiceError::CustomerNotFound(id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Cards
    // ------------------------------------------------------------------------

    pub fn list_cards(&self, customer_id: Uuid) -> Result<Vec<CardRecord>> {
        self.get_customer(customer_id)?;
        Ok(self.store.cards_for_customer(customer_id)?)
    }

    /// Hash and store a new card for an existing customer.
    pub fn add_card(&self, customer_id: Uuid, input: &CardInput) -> Result<CardRecord> {
        let card = prepare_card(input)?;
        self.get_customer(customer_id)?;

        let salt = self.draw_salt();
        let record = self
            .transformer
            .create_record_with_salt(customer_id, &card, salt);
        self.store.insert_card(&record)?;

        log::info!(
            "Added {} card {} for customer {}",
            record.card_type,
            record.id,
            customer_id
        );
        Ok(record)
    }

    /// Replace the data of an existing card. The salt is rotated.
    pub fn edit_card(
        &self,
        customer_id: Uuid,
        card_id: Uuid,
        input: &CardInput,
    ) -> Result<CardRecord> {
        let card = prepare_card(input)?;
        let previous = self.owned_card(customer_id, card_id)?;

        let salt = self.draw_salt();
        let record = self
            .transformer
            .update_record_with_salt(&card, &previous, salt);
        if !self.store.replace_card(&record)? {
            // Deleted between read and write
            return Err(ServiceError::CardNotFound {
                customer_id,
                card_id,
            });
        }

        log::info!("Rehashed card {} for customer {}", card_id, customer_id);
        Ok(record)
    }

    pub fn delete_card(&self, customer_id: Uuid, card_id: Uuid) -> Result<()> {
        self.owned_card(customer_id, card_id)?;
        if !self.store.delete_card(card_id)? {
            return Err(ServiceError::CardNotFound {
                customer_id,
                card_id,
            });
        }
        log::info!("Deleted card {} for customer {}", card_id, customer_id);
        Ok(())
    }

    /// Check whether the customer owns a card matching `candidate`.
    ///
    /// Each stored card is checked against its own salt. A corrupt card
    /// record aborts the check with [`ServiceError::Integrity`] rather than
    /// being counted as a mismatch.
    pub fn check_card(&self, customer_id: Uuid, candidate: &CardInput) -> Result<bool> {
        let card = prepare_card(candidate)?;
        self.get_customer(customer_id)?;

        for record in self.store.cards_for_customer(customer_id)? {
            match self.transformer.verify(&card, &record) {
                Ok(true) => {
                    log::info!("Card {} verified for customer {}", record.id, customer_id);
                    return Ok(true);
                }
                Ok(false) => {}
                Err(source) => {
                    log::error!(
                        "Card record {} of customer {} is corrupt: {}",
                        record.id,
                        customer_id,
                        source
                    );
                    return Err(ServiceError::Integrity {
                        card_id: record.id,
                        source,
                    });
                }
            }
        }

        log::info!("No matching card for customer {}", customer_id);
        Ok(false)
    }

    /// Draw a salt, holding the RNG lock only for the draw itself so that
    /// hashing runs outside it.
    fn draw_salt(&self) -> Salt {
        let mut rng = self.rng.lock().expect("card rng poisoned");
        Salt::generate(&mut *rng)
    }

    /// Fetch a card, treating cards of other customers as missing.
    fn owned_card(&self, customer_id: Uuid, card_id: Uuid) -> Result<CardRecord> {
        match self.store.get_card(card_id)? {
            Some(card) if card.customer_id == customer_id => Ok(card),
            _ => Err(ServiceError::CardNotFound {
                customer_id,
                card_id,
            }),
        }
    }
}
