//! SQLite persistence for customers and their card records.
//!
//! Card records are stored exactly as the hashing core produced them: the
//! digests and salt are opaque text columns. A card belongs to one customer
//! through `customer_id` and is removed with it.

use std::path::Path;

use card_hash::{CardRecord, CardType, KdfParams};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

use crate::model::Customer;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Customers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    date_of_birth TEXT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS CreditCards (
    id TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL,
    card_type TEXT NOT NULL,
    card_number_hash TEXT NOT NULL CHECK (card_number_hash <> ''),
    expiry_date_hash TEXT NOT NULL CHECK (expiry_date_hash <> ''),
    cvv_hash TEXT NOT NULL CHECK (cvv_hash <> ''),
    salt TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (customer_id) REFERENCES Customers(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_credit_cards_customer ON CreditCards(customer_id);
"#;

const CUSTOMER_COLUMNS: &str = "id, name, address, date_of_birth, created_at";
const CARD_COLUMNS: &str =
    "id, customer_id, card_type, card_number_hash, expiry_date_hash, cvv_hash, salt, created_at";

/// Customer and card storage backed by a SQLite file.
///
/// Each operation opens its own connection, so a store can be shared freely.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    db_path: String,
}

impl CustomerStore {
    /// Create a new store for the given database path.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_string_lossy().into_owned(),
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Open a connection with foreign-key enforcement switched on.
    fn open_connection(&self) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Create the tables if they do not exist yet.
    pub fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.open_connection()?;
        conn.execute_batch(SCHEMA)?;
        log::info!(
            "Customer database ready at {} (cards hashed with {:?})",
            self.db_path(),
            KdfParams::CURRENT
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------------

    pub fn insert_customer(&self, customer: &Customer) -> Result<(), rusqlite::Error> {
        let conn = self.open_connection()?;
        conn.execute(
            &format!("INSERT INTO Customers ({CUSTOMER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            params![
                customer.id.to_string(),
                customer.name,
                customer.address,
                customer.date_of_birth,
                customer.created_at,
            ],
        )?;
        log::debug!("Inserted customer {}", customer.id);
        Ok(())
    }

    /// Fetch a single customer by ID.
    pub fn get_customer(&self, id: Uuid) -> Result<Option<Customer>, rusqlite::Error> {
        let conn = self.open_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM Customers WHERE id = ?"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(customer_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// All customers, oldest first.
    pub fn list_customers(&self) -> Result<Vec<Customer>, rusqlite::Error> {
        let conn = self.open_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM Customers ORDER BY created_at, id"
        ))?;
        let customers = stmt.query_map([], customer_from_row)?;
        customers.collect()
    }

    /// Change name and address. Returns `false` when no such customer exists.
    pub fn update_customer(
        &self,
        id: Uuid,
        name: &str,
        address: &str,
    ) -> Result<bool, rusqlite::Error> {
        let conn = self.open_connection()?;
        let changed = conn.execute(
            "UPDATE Customers SET name = ?1, address = ?2 WHERE id = ?3",
            params![name, address, id.to_string()],
        )?;
        Ok(changed > 0)
    }

    /// Delete a customer and, through the foreign key, all of their cards.
    pub fn delete_customer(&self, id: Uuid) -> Result<bool, rusqlite::Error> {
        let conn = self.open_connection()?;
        let deleted = conn.execute("DELETE FROM Customers WHERE id = ?", [id.to_string()])?;
        if deleted > 0 {
            log::info!("Deleted customer {}", id);
        }
        Ok(deleted > 0)
    }

    // ------------------------------------------------------------------------
    // Cards
    // ------------------------------------------------------------------------

    pub fn insert_card(&self, card: &CardRecord) -> Result<(), rusqlite::Error> {
        let conn = self.open_connection()?;
        conn.execute(
            &format!("INSERT INTO CreditCards ({CARD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                card.id.to_string(),
                card.customer_id.to_string(),
                card.card_type.as_str(),
                card.card_number_digest,
                card.expiry_digest,
                card.cvv_digest,
                card.salt,
                card.created_at,
            ],
        )?;
        log::debug!("Inserted card {} for customer {}", card.id, card.customer_id);
        Ok(())
    }

    /// Fetch a single card by ID.
    pub fn get_card(&self, id: Uuid) -> Result<Option<CardRecord>, rusqlite::Error> {
        let conn = self.open_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM CreditCards WHERE id = ?"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(card_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Every card owned by `customer_id`, oldest first.
    pub fn cards_for_customer(&self, customer_id: Uuid) -> Result<Vec<CardRecord>, rusqlite::Error> {
        let conn = self.open_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM CreditCards WHERE customer_id = ? ORDER BY created_at, id"
        ))?;
        let cards = stmt.query_map([customer_id.to_string()], card_from_row)?;
        cards.collect()
    }

    /// Overwrite the card type, digests and salt of an existing card in one
    /// statement, so they can never be observed out of step.
    pub fn replace_card(&self, card: &CardRecord) -> Result<bool, rusqlite::Error> {
        let conn = self.open_connection()?;
        let changed = conn.execute(
            r#"
            UPDATE CreditCards
            SET card_type = ?1, card_number_hash = ?2, expiry_date_hash = ?3, cvv_hash = ?4, salt = ?5
            WHERE id = ?6 AND customer_id = ?7
            "#,
            params![
                card.card_type.as_str(),
                card.card_number_digest,
                card.expiry_digest,
                card.cvv_digest,
                card.salt,
                card.id.to_string(),
                card.customer_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a card by ID.
    pub fn delete_card(&self, id: Uuid) -> Result<bool, rusqlite::Error> {
        let conn = self.open_connection()?;
        let deleted = conn.execute("DELETE FROM CreditCards WHERE id = ?", [id.to_string()])?;
        Ok(deleted > 0)
    }
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn uuid_column(row: &Row<'_>, idx: usize) -> Result<Uuid, rusqlite::Error> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| conversion_error(idx, e))
}

fn customer_from_row(row: &Row<'_>) -> Result<Customer, rusqlite::Error> {
    Ok(Customer {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        date_of_birth: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn card_from_row(row: &Row<'_>) -> Result<CardRecord, rusqlite::Error> {
    let card_type: String = row.get(2)?;
    Ok(CardRecord {
        id: uuid_column(row, 0)?,
        customer_id: uuid_column(row, 1)?,
        card_type: card_type
            .parse::<CardType>()
            .map_err(|e| conversion_error(2, e))?,
        card_number_digest: row.get(3)?,
        expiry_digest: row.get(4)?,
        cvv_digest: row.get(5)?,
        salt: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// ============================================================================
// Tests
// ============================================================================
