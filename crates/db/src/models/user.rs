//! User row model.

use sqlx::FromRow;
use tessera_core::types::{Timestamp, UserId};
use tessera_core::user::User;

/// Full user row from the `users` table, password hash included.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
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

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            username: row.username,
            phone: row.phone,
            country: row.country,
            password_hash: row.password_hash,
            role: row.role,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
