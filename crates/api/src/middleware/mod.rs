//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Authenticates the bearer token and checks that its
//!   session is still live.
//! - [`client::ClientMeta`] -- User agent and client IP recorded on login.

pub mod auth;
pub mod client;
