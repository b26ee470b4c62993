//! Well-known role name constants.
//!
//! These must match the column default in `..._create_users.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
