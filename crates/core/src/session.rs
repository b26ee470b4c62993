//! Session record and its external projections.

use serde::Serialize;

use crate::types::{SessionId, Timestamp, UserId};

/// Server-side record of one logged-in client.
///
/// Activeness is one-way: once `revoked_at` is set or `expires_at` has
/// passed, the session never becomes active again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    /// SHA-512 hex digest of the refresh token issued at login.
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub last_used_at: Timestamp,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// Lifecycle state of a session at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Revoked,
    Expired,
}

impl Session {
    /// `revoked_at IS NULL AND expires_at > now`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.state_at(now) == SessionState::Active
    }

    /// Revocation wins over expiry when both apply.
    pub fn state_at(&self, now: Timestamp) -> SessionState {
        if self.revoked_at.is_some() {
            SessionState::Revoked
        } else if self.expires_at <= now {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            user_id: self.user_id,
            user_agent: self.user_agent.clone(),
            ip: self.ip.clone(),
            last_used_at: self.last_used_at,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Input for [`SessionStore::create`](crate::store::SessionStore::create).
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    /// Used for both `created_at` and the initial `last_used_at`.
    pub created_at: Timestamp,
}

impl NewSession {
    pub fn into_session(self) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            token_hash: self.token_hash,
            expires_at: self.expires_at,
            user_agent: self.user_agent,
            ip: self.ip,
            last_used_at: self.created_at,
            created_at: self.created_at,
            revoked_at: None,
        }
    }
}

/// Provenance metadata recorded on a session at login. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// Session as exposed to clients. Never carries the token digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub user_id: UserId,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub last_used_at: Timestamp,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}
