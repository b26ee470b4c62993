//! Repository for the `sessions` table.
//!
//! Every statement is scoped by session id or user id, so concurrent requests
//! for different sessions never contend on the same rows.

use sqlx::PgPool;
use tessera_core::session::NewSession;
use tessera_core::types::{SessionId, Timestamp, UserId};

use crate::models::session::SessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, expires_at, user_agent, ip, \
                       last_used_at, created_at, revoked_at";

/// Provides create, lookup, and revoke operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row. `last_used_at`
    /// starts equal to `created_at`.
    pub async fn create(pool: &PgPool, input: &NewSession) -> Result<SessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions
                (id, user_id, token_hash, expires_at, user_agent, ip, last_used_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(input.id)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id regardless of its state.
    pub async fn find_by_id(pool: &PgPool, id: SessionId) -> Result<Option<SessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's sessions that are neither revoked nor expired at `now`,
    /// most recently used first.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: UserId,
        now: Timestamp,
    ) -> Result<Vec<SessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE user_id = $1
               AND revoked_at IS NULL
               AND expires_at > $2
             ORDER BY last_used_at DESC"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(user_id)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Revoke a single session. Returns `true` if the row was updated.
    pub async fn revoke(pool: &PgPool, id: SessionId, at: Timestamp) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sessions SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL")
                .bind(id)
                .bind(at)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke all live sessions for a user. Returns the count of revoked sessions.
    pub async fn revoke_all_for_user(
        pool: &PgPool,
        user_id: UserId,
        at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = $2
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke all live sessions for a user except `keep_id`.
    pub async fn revoke_all_except(
        pool: &PgPool,
        user_id: UserId,
        keep_id: SessionId,
        at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = $3
             WHERE user_id = $1 AND id <> $2 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(keep_id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Set `last_used_at`. A missing row is not an error.
    pub async fn touch_last_used(
        pool: &PgPool,
        id: SessionId,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sessions SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(pool)
            .await?;
        Ok(())
    }
}
