//! Session lifecycle: login, access-token refresh, liveness, and logout.
//!
//! ```text
//!   login ──> Active ──revoke──> Revoked
//!               │
//!               └──clock passes expires_at──> Expired
//! ```
//!
//! Revoked and Expired are terminal and equivalent for authorization.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::digest::{hash_refresh_token, refresh_token_matches};
use crate::error::{CoreError, CoreResult};
use crate::session::{ClientInfo, NewSession, SessionSummary};
use crate::store::{SessionStore, UserStore};
use crate::tokens::TokenCodec;
use crate::types::{SessionId, Timestamp, UserId};
use crate::user::User;

/// Token pair and session handed back after a successful login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub session_id: SessionId,
}

/// Result of exchanging a refresh token.
#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

pub struct SessionLifecycle {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
}

impl SessionLifecycle {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            sessions,
            users,
            codec,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Open a new session for an already-verified user.
    ///
    /// Only the digest of the refresh token is persisted.
    pub async fn login(&self, user: &User, client: ClientInfo) -> CoreResult<IssuedTokens> {
        let session_id = Uuid::new_v4();
        let refresh_token = self.codec.issue_refresh(user.id, session_id)?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.codec.refresh_ttl())
            .ok_or_else(|| CoreError::Internal("session expiry out of range".into()))?;
        let input = NewSession {
            id: session_id,
            user_id: user.id,
            token_hash: hash_refresh_token(&refresh_token),
            expires_at,
            user_agent: client.user_agent,
            ip: client.ip,
            created_at: now,
        };
        self.sessions.create(input).await?;

        let access_token = self
            .codec
            .issue_access(user.id, session_id, &roles_for(user))?;

        tracing::info!(user_id = %user.id, %session_id, "Session created");

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            expires_in: self.codec.access_ttl().num_seconds(),
            session_id,
        })
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The refresh token and its stored digest stay as they are.
    pub async fn refresh(&self, refresh_token: &str) -> CoreResult<RefreshedAccess> {
        let claims = self.codec.verify_refresh(refresh_token)?;
        let session = self.sessions.get_by_id(claims.session_id).await?;

        let now = Utc::now();
        if !session.is_active_at(now) {
            tracing::debug!(session_id = %session.id, "Refresh on inactive session");
            return Err(CoreError::SessionExpiredOrRevoked);
        }

        if session.user_id != claims.user_id
            || !refresh_token_matches(refresh_token, &session.token_hash)
        {
            tracing::warn!(
                session_id = %session.id,
                user_id = %claims.user_id,
                "Refresh token does not match session, possible token compromise"
            );
            return Err(CoreError::RefreshMismatch);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| CoreError::user_not_found(session.user_id))?;

        let access_token = self
            .codec
            .issue_access(user.id, session.id, &roles_for(&user))?;
        self.touch(session.id, now).await;

        tracing::debug!(user_id = %user.id, session_id = %session.id, "Access token refreshed");

        Ok(RefreshedAccess {
            access_token,
            expires_in: self.codec.access_ttl().num_seconds(),
        })
    }

    /// Whether the session is neither revoked nor expired.
    ///
    /// A lookup failure is returned as an error, never as `Ok(true)`.
    pub async fn is_active(&self, session_id: SessionId) -> CoreResult<bool> {
        let session = self.sessions.get_by_id(session_id).await?;
        Ok(session.is_active_at(Utc::now()))
    }

    /// Revoke one session. Idempotent.
    pub async fn logout(&self, session_id: SessionId) -> CoreResult<()> {
        let changed = self.sessions.revoke(session_id, Utc::now()).await?;
        tracing::info!(%session_id, changed, "Session logged out");
        Ok(())
    }

    /// Revoke every session of the user. Returns how many were still live.
    pub async fn logout_all(&self, user_id: UserId) -> CoreResult<u64> {
        let revoked = self.sessions.revoke_all_for_user(user_id, Utc::now()).await?;
        tracing::info!(%user_id, revoked, "All sessions logged out");
        Ok(revoked)
    }

    /// Revoke every session of the user except `keep_id`.
    pub async fn logout_all_except(&self, user_id: UserId, keep_id: SessionId) -> CoreResult<u64> {
        let revoked = self
            .sessions
            .revoke_all_except(user_id, keep_id, Utc::now())
            .await?;
        tracing::info!(%user_id, keep_session_id = %keep_id, revoked, "Other sessions logged out");
        Ok(revoked)
    }

    pub async fn list_active(&self, user_id: UserId) -> CoreResult<Vec<SessionSummary>> {
        let sessions = self
            .sessions
            .list_active_for_user(user_id, Utc::now())
            .await?;
        Ok(sessions.iter().map(|s| s.summary()).collect())
    }

    pub async fn get_session(&self, session_id: SessionId) -> CoreResult<SessionSummary> {
        Ok(self.sessions.get_by_id(session_id).await?.summary())
    }

    async fn touch(&self, session_id: SessionId, at: Timestamp) {
        if let Err(e) = self.sessions.touch_last_used(session_id, at).await {
            tracing::warn!(error = %e, %session_id, "Failed to update session last_used_at");
        }
    }
}

fn roles_for(user: &User) -> Vec<String> {
    vec![user.role.clone()]
}
