use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied customer details, for creation and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            date_of_birth: None,
        }
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    /// Materialize into a customer with a new UUIDv7 identity.
    pub fn into_customer(self) -> Customer {
        Customer {
            id: Uuid::now_v7(),
            name: self.name,
            address: self.address,
            date_of_birth: self.date_of_birth,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let dob = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
        let new = NewCustomer::new("Ada", "1 Analytical Way").with_date_of_birth(dob);
        assert_eq!(new.name, "Ada");
        assert_eq!(new.date_of_birth, Some(dob));
    }

    #[test]
    fn test_into_customer_assigns_unique_ids() {
        let a = NewCustomer::new("Ada", "x").into_customer();
        let b = NewCustomer::new("Ada", "x").into_customer();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, b.name);
    }
}
