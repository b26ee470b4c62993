//! PostgreSQL adapters for the core storage ports.

use async_trait::async_trait;
use tessera_core::error::{CoreError, CoreResult};
use tessera_core::session::{NewSession, Session};
use tessera_core::store::{SessionStore, UserStore};
use tessera_core::types::{SessionId, Timestamp, UserId};
use tessera_core::user::{NewUser, User};

use crate::repositories::{SessionRepo, UserRepo};
use crate::DbPool;

/// Map a sqlx error into the core taxonomy.
///
/// Unique violations on `uq_*` constraints (and the primary key) become
/// `Conflict`; everything else is a store outage.
fn store_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::StoreUnavailable("database error".into())
}

/// [`SessionStore`] backed by the `sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, input: NewSession) -> CoreResult<Session> {
        SessionRepo::create(&self.pool, &input)
            .await
            .map(Session::from)
            .map_err(store_error)
    }

    async fn get_by_id(&self, id: SessionId) -> CoreResult<Session> {
        SessionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(Session::from)
            .ok_or_else(|| CoreError::session_not_found(id))
    }

    async fn list_active_for_user(
        &self,
        user_id: UserId,
        now: Timestamp,
    ) -> CoreResult<Vec<Session>> {
        let rows = SessionRepo::list_active_for_user(&self.pool, user_id, now)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn revoke(&self, id: SessionId, at: Timestamp) -> CoreResult<bool> {
        SessionRepo::revoke(&self.pool, id, at)
            .await
            .map_err(store_error)
    }

    async fn revoke_all_for_user(&self, user_id: UserId, at: Timestamp) -> CoreResult<u64> {
        SessionRepo::revoke_all_for_user(&self.pool, user_id, at)
            .await
            .map_err(store_error)
    }

    async fn revoke_all_except(
        &self,
        user_id: UserId,
        keep_id: SessionId,
        at: Timestamp,
    ) -> CoreResult<u64> {
        SessionRepo::revoke_all_except(&self.pool, user_id, keep_id, at)
            .await
            .map_err(store_error)
    }

    async fn touch_last_used(&self, id: SessionId, at: Timestamp) -> CoreResult<()> {
        SessionRepo::touch_last_used(&self.pool, id, at)
            .await
            .map_err(store_error)
    }
}

/// [`UserStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: NewUser) -> CoreResult<User> {
        UserRepo::create(&self.pool, &input)
            .await
            .map(User::from)
            .map_err(store_error)
    }

    async fn find_by_id(&self, id: UserId) -> CoreResult<Option<User>> {
        let row = UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let row = UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(store_error)?;
        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<User>> {
        let row = UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(store_error)?;
        Ok(row.map(User::from))
    }
}
