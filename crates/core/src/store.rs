//! Storage and credential ports the session core depends on.
//!
//! Adapters live elsewhere: PostgreSQL in `tessera-db`, in-memory in
//! [`crate::memory`], argon2 in the API crate.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::session::{NewSession, Session};
use crate::types::{SessionId, Timestamp, UserId};
use crate::user::{NewUser, User};

/// Owns session records keyed by session id.
///
/// Every operation is scoped to one session or one user's sessions; no
/// implementation may lock more than that.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session. Fails with `Conflict` only if the id already exists.
    async fn create(&self, input: NewSession) -> CoreResult<Session>;

    /// Fetch a session by id, or `NotFound`.
    async fn get_by_id(&self, id: SessionId) -> CoreResult<Session>;

    /// Sessions of `user_id` that are neither revoked nor expired at `now`,
    /// most recently used first. An empty result is not an error.
    async fn list_active_for_user(&self, user_id: UserId, now: Timestamp)
        -> CoreResult<Vec<Session>>;

    /// Set `revoked_at` if not already set. Returns whether a row changed;
    /// already-revoked and unknown ids are no-ops.
    async fn revoke(&self, id: SessionId, at: Timestamp) -> CoreResult<bool>;

    /// Revoke every not-yet-revoked session of the user. Returns the count.
    async fn revoke_all_for_user(&self, user_id: UserId, at: Timestamp) -> CoreResult<u64>;

    /// Like [`revoke_all_for_user`](Self::revoke_all_for_user) but leaves
    /// `keep_id` untouched.
    async fn revoke_all_except(
        &self,
        user_id: UserId,
        keep_id: SessionId,
        at: Timestamp,
    ) -> CoreResult<u64>;

    /// Best-effort `last_used_at` update. Callers must not fail on its error.
    async fn touch_last_used(&self, id: SessionId, at: Timestamp) -> CoreResult<()>;
}

/// Read access to users plus registration inserts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Duplicate email, username, or phone yields `Conflict`.
    async fn create(&self, input: NewUser) -> CoreResult<User>;

    async fn find_by_id(&self, id: UserId) -> CoreResult<Option<User>>;

    /// Exact (case-sensitive) match.
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    /// Exact (case-sensitive) match.
    async fn find_by_username(&self, username: &str) -> CoreResult<Option<User>>;
}

/// Password hashing capability. The core calls it but does not implement it.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> CoreResult<String>;

    /// `Ok(false)` for a wrong password; `Err` only for a malformed hash or an
    /// internal failure.
    fn verify(&self, password: &str, hash: &str) -> CoreResult<bool>;
}
