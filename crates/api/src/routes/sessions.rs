//! Route definitions for the `/sessions` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`. All require auth.
///
/// ```text
/// GET    /          -> list
/// DELETE /          -> logout_all
/// GET    /current   -> current
/// DELETE /current   -> logout_current
/// DELETE /others    -> logout_others
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list).delete(sessions::logout_all))
        .route(
            "/current",
            get(sessions::current).delete(sessions::logout_current),
        )
        .route("/others", delete(sessions::logout_others))
}
