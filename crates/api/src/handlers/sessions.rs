//! Handlers for the `/sessions` resource: listing and the logout variants.
//!
//! Every handler acts on the caller's own sessions; the session id always
//! comes from the authenticated access token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tessera_core::session::SessionSummary;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Count returned by the bulk logout endpoints.
#[derive(Debug, Serialize)]
pub struct RevokedCount {
    pub revoked: u64,
}

/// GET /api/v1/sessions
///
/// Live sessions of the caller, most recently used first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SessionSummary>>>> {
    let sessions = state.lifecycle.list_active(auth.user_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/sessions/current
pub async fn current(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<SessionSummary>>> {
    let session = state.lifecycle.get_session(auth.session_id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/sessions/current
///
/// Log out the calling session. Returns 204 No Content.
pub async fn logout_current(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<StatusCode> {
    state.lifecycle.logout(auth.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/others
///
/// Log out every other session of the caller, keeping the current one.
pub async fn logout_others(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<RevokedCount>>> {
    let revoked = state
        .lifecycle
        .logout_all_except(auth.user_id, auth.session_id)
        .await?;
    Ok(Json(DataResponse {
        data: RevokedCount { revoked },
    }))
}

/// DELETE /api/v1/sessions
///
/// Log out everywhere, the calling session included.
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<RevokedCount>>> {
    let revoked = state.lifecycle.logout_all(auth.user_id).await?;
    Ok(Json(DataResponse {
        data: RevokedCount { revoked },
    }))
}
