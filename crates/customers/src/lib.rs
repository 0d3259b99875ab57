//! Customers and their hashed payment cards.
//!
//! Card data is tokenized by [`card_hash`] before it reaches [`store`]; this
//! crate adds input validation, SQLite persistence and the service layer that
//! ties them together.

pub mod configuration;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod validate;

pub use card_hash::{CardInput, CardRecord, CardType};
pub use configuration::ServiceConfig;
pub use error::{ConfigError, ServiceError, ValidationError};
pub use model::{Customer, NewCustomer};
pub use service::CustomerService;
pub use store::CustomerStore;
