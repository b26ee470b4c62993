//! Authentication primitives owned by the HTTP layer.
//!
//! - [`password`] -- Argon2id password hashing and the [`CredentialHasher`]
//!   adapter handed to the core.
//!
//! [`CredentialHasher`]: tessera_core::store::CredentialHasher

pub mod password;
