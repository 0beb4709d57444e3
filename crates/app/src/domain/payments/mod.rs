//! Payments
//!
//! Card fields are checked for format only; nothing is charged.

pub mod data;
pub mod errors;
pub mod validator;

pub use data::PaymentDetails;
pub use errors::PaymentError;
pub use validator::validate;
