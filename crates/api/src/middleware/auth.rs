//! Bearer authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tessera_core::error::CoreError;
use tessera_core::gate::AuthenticatedIdentity;
use tessera_core::types::{SessionId, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved by the [`AuthenticationGate`].
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, session_id = %user.session_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// [`AuthenticationGate`]: tessera_core::gate::AuthenticationGate
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    /// The session the presented access token belongs to.
    pub session_id: SessionId,
    pub roles: Vec<String>,
}

impl From<AuthenticatedIdentity> for AuthUser {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            session_id: identity.session_id,
            roles: identity.roles,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?),
        };

        let identity = state.gate.authenticate(header).await?;
        Ok(identity.into())
    }
}
