//! Users
//!
//! Accounts live with the identity provider; this crate only needs to tell owners apart.

use crate::uuids::TypedUuid;

/// Marker for identifiers issued by the identity provider.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
