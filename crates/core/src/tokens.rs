//! Access and refresh token signing and verification.
//!
//! Both kinds are HS256-signed JWTs carrying the user id (`uid`), the session
//! id (`sid`), issue and expiry times, and a random `jti`. Each kind has its own
//! secret, so an access token never verifies as a refresh token and vice versa.
//!
//! Verification is pure: it checks signature, algorithm, and expiry and never
//! consults the session store. Revocation is the session row's job.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{ConfigError, TokenConfig};
use crate::error::{CoreError, CoreResult};
use crate::types::{SessionId, UserId};

/// The only algorithm tokens are signed with or accepted under.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "uid")]
    pub user_id: UserId,
    #[serde(rename = "sid")]
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    pub jti: String,
}

/// Claims embedded in every refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "uid")]
    pub user_id: UserId,
    #[serde(rename = "sid")]
    pub session_id: SessionId,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies access/refresh tokens. Immutable after construction and
/// safe to share across requests.
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from a validated configuration.
    pub fn new(config: &TokenConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        // `iat` is a non-optional field on both claim structs, so decoding
        // already fails without it.
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            access: SigningKeys::from_secret(&config.access_secret),
            refresh: SigningKeys::from_secret(&config.refresh_secret),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            validation,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(
        &self,
        user_id: UserId,
        session_id: SessionId,
        roles: &[String],
    ) -> CoreResult<String> {
        let iat = Utc::now().timestamp();
        let claims = AccessClaims {
            user_id,
            session_id,
            roles: roles.to_vec(),
            iat,
            exp: iat + self.access_ttl.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        };
        sign(&claims, &self.access.encoding)
    }

    pub fn issue_refresh(&self, user_id: UserId, session_id: SessionId) -> CoreResult<String> {
        let iat = Utc::now().timestamp();
        let claims = RefreshClaims {
            user_id,
            session_id,
            iat,
            exp: iat + self.refresh_ttl.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        };
        sign(&claims, &self.refresh.encoding)
    }

    /// Verify an access token. Any failure is reported as [`CoreError::InvalidToken`].
    pub fn verify_access(&self, token: &str) -> CoreResult<AccessClaims> {
        verify(token, &self.access.decoding, &self.validation)
    }

    /// Verify a refresh token. Any failure is reported as [`CoreError::InvalidToken`].
    pub fn verify_refresh(&self, token: &str) -> CoreResult<RefreshClaims> {
        verify(token, &self.refresh.decoding, &self.validation)
    }
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey) -> CoreResult<String> {
    encode(&Header::new(ALGORITHM), claims, key)
        .map_err(|e| CoreError::Internal(format!("Token signing error: {e}")))
}

fn verify<T: DeserializeOwned>(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> CoreResult<T> {
    decode::<T>(token, key, validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            CoreError::InvalidToken
        })
}
