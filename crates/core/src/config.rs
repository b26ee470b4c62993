//! Token signing configuration.
//!
//! Built once at startup and handed to [`TokenCodec::new`](crate::tokens::TokenCodec::new).
//! Nothing downstream reads the environment.

use std::fmt;

use chrono::Duration;

/// Default access token lifetime in minutes.
const DEFAULT_ACCESS_TTL_MINS: i64 = 15;
/// Default refresh token (and session) lifetime in days.
const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;
/// Longest accepted access token lifetime in minutes (one day).
const MAX_ACCESS_TTL_MINS: i64 = 24 * 60;
/// Longest accepted refresh token lifetime in days (ten years).
const MAX_REFRESH_TTL_DAYS: i64 = 3650;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} must be positive")]
    NonPositiveTtl(&'static str),

    #[error("{name} must be between one second and {max}")]
    TtlOutOfRange { name: &'static str, max: &'static str },

    #[error("ACCESS_SECRET and REFRESH_SECRET must be distinct values")]
    SharedSecret,
}

/// Secrets and lifetimes for the two token kinds.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Independent of `access_secret`.
    pub refresh_secret: String,
    pub access_ttl: Duration,
    /// Also the lifetime of the session row created at login.
    pub refresh_ttl: Duration,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenConfig {
    /// Build a config with the default lifetimes (15 minutes / 30 days).
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::minutes(DEFAULT_ACCESS_TTL_MINS),
            refresh_ttl: Duration::days(DEFAULT_REFRESH_TTL_DAYS),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Load token configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `ACCESS_SECRET`          | **yes**  | --      |
    /// | `REFRESH_SECRET`         | **yes**  | --      |
    /// | `ACCESS_TOKEN_TTL_MINS`  | no       | `15`    |
    /// | `REFRESH_TOKEN_TTL_DAYS` | no       | `30`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary
    /// key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = lookup("ACCESS_SECRET").ok_or(ConfigError::Missing("ACCESS_SECRET"))?;
        let refresh_secret =
            lookup("REFRESH_SECRET").ok_or(ConfigError::Missing("REFRESH_SECRET"))?;

        let access_ttl = parse_ttl(
            &lookup,
            "ACCESS_TOKEN_TTL_MINS",
            DEFAULT_ACCESS_TTL_MINS,
            Duration::try_minutes,
        )?;
        let refresh_ttl = parse_ttl(
            &lookup,
            "REFRESH_TOKEN_TTL_DAYS",
            DEFAULT_REFRESH_TTL_DAYS,
            Duration::try_days,
        )?;

        let config = Self::new(access_secret, refresh_secret)
            .with_access_ttl(access_ttl)
            .with_refresh_ttl(refresh_ttl);
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the codec relies on: both secrets present and
    /// distinct, both lifetimes positive and within bounds.
    ///
    /// Lifetimes are whole seconds in the issued claims, so anything under
    /// one second is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.is_empty() {
            return Err(ConfigError::Empty("ACCESS_SECRET"));
        }
        if self.refresh_secret.is_empty() {
            return Err(ConfigError::Empty("REFRESH_SECRET"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::SharedSecret);
        }
        if self.access_ttl <= Duration::zero() {
            return Err(ConfigError::NonPositiveTtl("access_ttl"));
        }
        if self.refresh_ttl <= Duration::zero() {
            return Err(ConfigError::NonPositiveTtl("refresh_ttl"));
        }
        if self.access_ttl < Duration::seconds(1)
            || self.access_ttl > Duration::minutes(MAX_ACCESS_TTL_MINS)
        {
            return Err(ConfigError::TtlOutOfRange {
                name: "access_ttl",
                max: "1 day",
            });
        }
        if self.refresh_ttl < Duration::seconds(1)
            || self.refresh_ttl > Duration::days(MAX_REFRESH_TTL_DAYS)
        {
            return Err(ConfigError::TtlOutOfRange {
                name: "refresh_ttl",
                max: "3650 days",
            });
        }
        Ok(())
    }
}

/// Read a positive whole-unit TTL, converting it with `to_duration`.
/// Values too large to represent as a [`Duration`] are rejected.
fn parse_ttl<F>(
    lookup: &F,
    name: &'static str,
    default: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return to_duration(default).ok_or(ConfigError::InvalidNumber {
            name,
            value: default.to_string(),
        });
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => {
            to_duration(value).ok_or(ConfigError::InvalidNumber { name, value: raw })
        }
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_ttls_unset() {
        let config = TokenConfig::from_lookup(lookup_from(&[
            ("ACCESS_SECRET", "access-secret"),
            ("REFRESH_SECRET", "refresh-secret"),
        ]))
        .expect("config should load");

        assert_eq!(config.access_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_ttl, Duration::days(30));
    }

    #[test]
    fn ttls_are_read_from_lookup() {
        let config = TokenConfig::from_lookup(lookup_from(&[
            ("ACCESS_SECRET", "access-secret"),
            ("REFRESH_SECRET", "refresh-secret"),
            ("ACCESS_TOKEN_TTL_MINS", "5"),
            ("REFRESH_TOKEN_TTL_DAYS", "7"),
        ]))
        .expect("config should load");

        assert_eq!(config.access_ttl, Duration::minutes(5));
        assert_eq!(config.refresh_ttl, Duration::days(7));
    }

    #[test]
    fn missing_secret_is_rejected() {
        let result = TokenConfig::from_lookup(lookup_from(&[("ACCESS_SECRET", "only-one")]));
        assert_matches!(result, Err(ConfigError::Missing("REFRESH_SECRET")));
    }

    #[test]
    fn shared_secret_is_rejected() {
        let result = TokenConfig::from_lookup(lookup_from(&[
            ("ACCESS_SECRET", "same"),
            ("REFRESH_SECRET", "same"),
        ]));
        assert_matches!(result, Err(ConfigError::SharedSecret));
    }

    #[test]
    fn non_numeric_ttl_is_rejected() {
        let result = TokenConfig::from_lookup(lookup_from(&[
            ("ACCESS_SECRET", "a"),
            ("REFRESH_SECRET", "b"),
            ("ACCESS_TOKEN_TTL_MINS", "fifteen"),
        ]));
        assert_matches!(
            result,
            Err(ConfigError::InvalidNumber { name: "ACCESS_TOKEN_TTL_MINS", .. })
        );
    }

    #[test]
    fn unrepresentable_ttl_is_rejected_without_panicking() {
        let result = TokenConfig::from_lookup(lookup_from(&[
            ("ACCESS_SECRET", "a"),
            ("REFRESH_SECRET", "b"),
            ("REFRESH_TOKEN_TTL_DAYS", "9223372036854775807"),
        ]));
        assert_matches!(
            result,
            Err(ConfigError::InvalidNumber { name: "REFRESH_TOKEN_TTL_DAYS", .. })
        );

        let result = TokenConfig::from_lookup(lookup_from(&[
            ("ACCESS_SECRET", "a"),
            ("REFRESH_SECRET", "b"),
            ("ACCESS_TOKEN_TTL_MINS", "9223372036854775807"),
        ]));
        assert_matches!(
            result,
            Err(ConfigError::InvalidNumber { name: "ACCESS_TOKEN_TTL_MINS", .. })
        );
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let result = TokenConfig::from_lookup(lookup_from(&[
            ("ACCESS_SECRET", "a"),
            ("REFRESH_SECRET", "b"),
            ("REFRESH_TOKEN_TTL_DAYS", "100000000"),
        ]));
        assert_matches!(
            result,
            Err(ConfigError::TtlOutOfRange { name: "refresh_ttl", .. })
        );

        let config = TokenConfig::new("a", "b").with_refresh_ttl(Duration::days(3651));
        assert_matches!(
            config.validate(),
            Err(ConfigError::TtlOutOfRange { name: "refresh_ttl", .. })
        );

        let config = TokenConfig::new("a", "b").with_access_ttl(Duration::minutes(24 * 60 + 1));
        assert_matches!(
            config.validate(),
            Err(ConfigError::TtlOutOfRange { name: "access_ttl", .. })
        );

        let config = TokenConfig::new("a", "b").with_refresh_ttl(Duration::days(3650));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sub_second_ttl_is_rejected() {
        let config = TokenConfig::new("a", "b").with_access_ttl(Duration::milliseconds(500));
        assert_matches!(
            config.validate(),
            Err(ConfigError::TtlOutOfRange { name: "access_ttl", .. })
        );

        let config = TokenConfig::new("a", "b").with_refresh_ttl(Duration::milliseconds(999));
        assert_matches!(
            config.validate(),
            Err(ConfigError::TtlOutOfRange { name: "refresh_ttl", .. })
        );

        let config = TokenConfig::new("a", "b").with_access_ttl(Duration::seconds(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = TokenConfig::new("super-secret-access", "super-secret-refresh");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
