//! Session Records

use jiff::Timestamp;

use crate::{
    domain::{carts::models::Cart, users::UserUuid},
    uuids::TypedUuid,
};

/// Session key handed to the client.
pub type SessionKey = TypedUuid<Session>;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub key: SessionKey,
    pub user: Option<UserUuid>,
    pub cart: Cart,
    pub expires_at: Timestamp,
}

impl Session {
    /// A signed-out session with an empty cart.
    #[must_use]
    pub fn anonymous(key: SessionKey, expires_at: Timestamp) -> Self {
        Self {
            key,
            user: None,
            cart: Cart::new(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Attach a user. The cart built while signed out is kept.
    pub fn sign_in(&mut self, user: UserUuid) {
        self.user = Some(user);
    }
}
