//! Payment Data

use std::fmt;

use zeroize::Zeroizing;

/// Card fields as submitted on the payment form.
///
/// The card number and CVV are wiped from memory when dropped.
#[derive(Clone)]
pub struct PaymentDetails {
    pub card_number: Zeroizing<String>,
    pub cvv: Zeroizing<String>,
    pub expiry: String,
}

impl PaymentDetails {
    pub fn new(
        card_number: impl Into<String>,
        cvv: impl Into<String>,
        expiry: impl Into<String>,
    ) -> Self {
        Self {
            card_number: Zeroizing::new(card_number.into()),
            cvv: Zeroizing::new(cvv.into()),
            expiry: expiry.into(),
        }
    }
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &"<redacted>")
            .field("cvv", &"<redacted>")
            .field("expiry", &self.expiry)
            .finish()
    }
}
