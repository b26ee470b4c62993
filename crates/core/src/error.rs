/// Domain error taxonomy shared by the token codec, the stores, and the
/// session lifecycle.
///
/// Variants are coarse on purpose: the transport layer maps each kind to a
/// single user-facing outcome, and the messages never reveal which part of a
/// credential was wrong.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Unknown identifier or wrong password at login.
    #[error("Invalid credentials")]
    InvalidCredential,

    /// Malformed, unsigned, wrongly-signed, or expired token.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The session behind a token has been revoked or has passed `expires_at`.
    #[error("Session expired or revoked")]
    SessionExpiredOrRevoked,

    /// The presented refresh token does not match the digest stored on its
    /// session. Treated as a possible token compromise.
    #[error("Refresh token does not match the session")]
    RefreshMismatch,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The underlying persistence layer failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn session_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "session",
            id: id.to_string(),
        }
    }

    pub fn user_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "user",
            id: id.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();
        CoreError::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}
