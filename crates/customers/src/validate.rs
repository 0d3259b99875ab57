//! Validation of caller-supplied customer and card data.
//!
//! The hashing core assumes its input is already well formed; these checks
//! run before any card reaches it.

use card_hash::CardInput;

use crate::error::ValidationError;
use crate::model::NewCustomer;

const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 19;

/// Strip the separators people type into card numbers (spaces and dashes).
pub fn normalize_card_number(number: &str) -> String {
    number.chars().filter(|c| !matches!(c, ' ' | '-')).collect()
}

/// Standard payment-card checksum over 13 to 19 digits.
///
/// Spaces and dashes are ignored; any other non-digit fails. The length
/// bound is stricter than a bare checksum test: a short string such as
/// `"0"` passes Luhn but is not a card number.
pub fn luhn_valid(number: &str) -> bool {
    let mut digits = Vec::with_capacity(MAX_CARD_DIGITS);
    for c in normalize_card_number(number).chars() {
        match c.to_digit(10) {
            Some(d) => digits.push(d),
            None => return false,
        }
    }

    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// `MM/YYYY` with `1 <= MM <= 12` and `YYYY >= 1`.
pub fn expiry_valid(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };

    if month.len() != 2 || year.len() != 4 {
        return false;
    }
    if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
        return false;
    }

    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<u32>()) else {
        return false;
    };

    (1..=12).contains(&month) && year >= 1
}

/// Exactly three ASCII digits.
pub fn cvv_valid(cvv: &str) -> bool {
    cvv.len() == 3 && cvv.bytes().all(|b| b.is_ascii_digit())
}

/// Check every field of a card, reporting the first failure.
pub fn validate_card(input: &CardInput) -> Result<(), ValidationError> {
    if !luhn_valid(&input.card_number) {
        return Err(ValidationError::InvalidCardNumber);
    }
    if !expiry_valid(&input.expiry_date) {
        return Err(ValidationError::InvalidExpiryDate);
    }
    if !cvv_valid(&input.cvv) {
        return Err(ValidationError::InvalidCvv);
    }
    Ok(())
}

/// Validate a card and return a copy with the card number normalized, so the
/// same card hashes identically however it was typed.
pub fn prepare_card(input: &CardInput) -> Result<CardInput, ValidationError> {
    validate_card(input)?;
    Ok(CardInput::new(
        input.card_type,
        normalize_card_number(&input.card_number),
        input.expiry_date.as_str(),
        input.cvv.as_str(),
    ))
}

pub fn validate_customer(customer: &NewCustomer) -> Result<(), ValidationError> {
    if customer.name.trim().is_empty() {
        return Err(ValidationError::Blank("name"));
    }
    if customer.address.trim().is_empty() {
        return Err(ValidationError::Blank("address"));
    }
    Ok(())
}
