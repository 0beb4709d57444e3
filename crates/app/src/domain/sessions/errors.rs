//! Session store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionsError {
    #[error("session lifetime of {0} minutes is out of range")]
    InvalidTtl(u64),

    #[error("session expiry overflows the timestamp range")]
    Expiry(#[source] jiff::Error),
}
