//! Shared response envelope types for API handlers.
//!
//! Resource responses use a `{ "data": ... }` envelope. The token endpoints
//! (`/auth/login`, `/auth/refresh`) return their payload bare.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: summaries }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
