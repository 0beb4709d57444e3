//! Payment errors.

use thiserror::Error;

/// Reasons a payment form is rejected, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment declined, try another card")]
    TestCardRejected,

    #[error("invalid CVV, expected exactly 3 digits")]
    InvalidCvv,

    #[error("invalid expiry, expected MM/YY")]
    InvalidExpiry,
}
