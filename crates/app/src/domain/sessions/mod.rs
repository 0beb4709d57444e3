//! Sessions
//!
//! A session carries the signed-in user, if any, and the cart being built.

pub mod errors;
pub mod records;
pub mod store;

pub use errors::SessionsError;
pub use records::{Session, SessionKey};
pub use store::*;
