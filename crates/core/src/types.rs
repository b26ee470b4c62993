/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Users are keyed by random (v4) UUIDs.
pub type UserId = uuid::Uuid;

/// Sessions are keyed by random (v4) UUIDs, generated at login.
pub type SessionId = uuid::Uuid;
