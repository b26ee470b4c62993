//! Handlers for the `/auth` resource (register, login, refresh).
//!
//! Logout lives on `/sessions`, where each variant names what it revokes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tessera_core::types::SessionId;
use tessera_core::user::{NewAccount, UserProfile};

use crate::error::{AppError, AppResult};
use crate::middleware::client::ClientMeta;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or username.
    pub identification: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub session_id: SessionId,
    pub user: UserProfile,
}

/// Successful refresh response. The refresh token is not rotated.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account. Returns 201 with the public profile.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<NewAccount>,
) -> AppResult<(StatusCode, Json<DataResponse<UserProfile>>)> {
    let profile = state.accounts.register(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email or username + password and open a session.
pub async fn login(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let identification = input.identification.trim();
    if identification.is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "identification and password are required".into(),
        ));
    }

    let user = state
        .accounts
        .authenticate(identification, &input.password)
        .await?;
    let issued = state.lifecycle.login(&user, client).await?;

    Ok(Json(LoginResponse {
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
        expires_in: issued.expires_in,
        session_id: issued.session_id,
        user: UserProfile::from(&user),
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new access token bound to the same session.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let refreshed = state.lifecycle.refresh(input.refresh_token.trim()).await?;
    Ok(Json(RefreshResponse {
        access_token: refreshed.access_token,
        expires_in: refreshed.expires_in,
    }))
}
