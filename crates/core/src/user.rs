//! User entity, registration input, and public projection.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{Timestamp, UserId};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Full user record.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserProfile`] for external-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub country: String,
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub country: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            phone: user.phone.clone(),
            country: user.country.clone(),
            role: user.role.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// Registration input as received from a client. The password is plaintext
/// here and is hashed before anything is stored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccount {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = 256))]
    pub password: String,
    #[validate(length(min = 5, max = 32))]
    pub phone: String,
    #[validate(length(min = 2, max = 100))]
    pub country: String,
}

/// DTO handed to [`UserStore::create`](crate::store::UserStore::create).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub country: String,
    pub password_hash: String,
    pub role: String,
}
