//! Handlers for the `/users/me` resource.

use axum::extract::State;
use axum::Json;
use tessera_core::user::UserProfile;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let profile = state.accounts.profile(auth.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/users/me/verified
pub async fn verified(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<bool>>> {
    let is_verified = state.accounts.is_verified(auth.user_id).await?;
    Ok(Json(DataResponse { data: is_verified }))
}
