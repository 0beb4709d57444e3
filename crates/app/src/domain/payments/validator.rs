//! Payment Validator

use crate::domain::payments::{data::PaymentDetails, errors::PaymentError};

const TEST_CARD_DIGITS: &str = "0000000000000000";

/// Check card fields against the mock gateway's format rules.
///
/// Rules run in order and the first failure is returned:
///
/// 1. the card number, reduced to its digits, must not be the all-zero test card;
/// 2. the CVV must be exactly three digits;
/// 3. the expiry must look like `DD/DD`. Month range and past dates are not checked.
///
/// Surrounding whitespace on each field is ignored.
///
/// # Errors
///
/// Returns the [`PaymentError`] for the first rule that fails.
pub fn validate(card_number: &str, cvv: &str, expiry: &str) -> Result<(), PaymentError> {
    let digits: String = card_number.chars().filter(char::is_ascii_digit).collect();

    if digits == TEST_CARD_DIGITS {
        return Err(PaymentError::TestCardRejected);
    }

    if !matches_digit_groups(cvv.trim(), &[3]) {
        return Err(PaymentError::InvalidCvv);
    }

    if !matches_digit_groups(expiry.trim(), &[2, 2]) {
        return Err(PaymentError::InvalidExpiry);
    }

    Ok(())
}

impl PaymentDetails {
    /// Validate these details. See [`validate`].
    ///
    /// # Errors
    ///
    /// Returns the [`PaymentError`] for the first rule that fails.
    pub fn validate(&self) -> Result<(), PaymentError> {
        validate(&self.card_number, &self.cvv, &self.expiry)
    }
}

/// `value` is slash-separated groups of ASCII digits with exactly the given lengths.
fn matches_digit_groups(value: &str, lengths: &[usize]) -> bool {
    let mut groups = value.split('/');

    let all_match = lengths.iter().all(|&length| {
        groups
            .next()
            .is_some_and(|group| group.len() == length && group.bytes().all(|b| b.is_ascii_digit()))
    });

    all_match && groups.next().is_none()
}
