pub mod auth;
pub mod health;
pub mod sessions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                  register (public)
/// /auth/login                     login (public)
/// /auth/refresh                   refresh access token (public)
///
/// /users/me                       profile (auth)
/// /users/me/verified              verification flag (auth)
///
/// /sessions                       list live sessions, logout everywhere (auth)
/// /sessions/current               get, logout current session (auth)
/// /sessions/others                logout all other sessions (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Public token endpoints.
        .nest("/auth", auth::router())
        // Caller profile.
        .nest("/users", users::router())
        // Session listing and logout variants.
        .nest("/sessions", sessions::router())
}
