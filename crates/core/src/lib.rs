//! Session and token lifecycle core.
//!
//! - [`tokens`] -- access/refresh JWT issuing and verification.
//! - [`store`] -- storage and password-hashing ports.
//! - [`lifecycle`] -- login, refresh, liveness, logout.
//! - [`gate`] -- per-request bearer authentication.
//! - [`accounts`] -- registration and credential checks.
//! - [`memory`] -- in-memory store adapters.

pub mod accounts;
pub mod config;
pub mod digest;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod memory;
pub mod roles;
pub mod session;
pub mod store;
pub mod tokens;
pub mod types;
pub mod user;
