//! Request-time authentication gate.
//!
//! Couples the stateless access-token check with a stateful session liveness
//! check: a token alone cannot express "logged out now", so every protected
//! call pays one session lookup. Any ambiguous outcome denies access.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::lifecycle::SessionLifecycle;
use crate::types::{SessionId, UserId};

/// Identity of the caller of a protected request, threaded explicitly into
/// handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub roles: Vec<String>,
}

pub struct AuthenticationGate {
    lifecycle: Arc<SessionLifecycle>,
}

impl AuthenticationGate {
    pub fn new(lifecycle: Arc<SessionLifecycle>) -> Self {
        Self { lifecycle }
    }

    /// Authenticate a request from the raw value of its `Authorization` header.
    ///
    /// Every rejection is [`CoreError::Unauthorized`].
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> CoreResult<AuthenticatedIdentity> {
        let header =
            authorization.ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = bearer_token(header).ok_or_else(|| {
            unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        })?;

        let claims = self
            .lifecycle
            .codec()
            .verify_access(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        match self.lifecycle.is_active(claims.session_id).await {
            Ok(true) => Ok(AuthenticatedIdentity {
                user_id: claims.user_id,
                session_id: claims.session_id,
                roles: claims.roles,
            }),
            Ok(false) => Err(unauthorized("Session expired or revoked")),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    session_id = %claims.session_id,
                    "Session liveness check failed, denying request"
                );
                Err(unauthorized("Session expired or revoked"))
            }
        }
    }
}

/// Extract the token from `Bearer <token>`. The scheme is case-insensitive;
/// anything other than exactly two parts is rejected.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

fn unauthorized(message: &str) -> CoreError {
    CoreError::Unauthorized(message.to_string())
}
