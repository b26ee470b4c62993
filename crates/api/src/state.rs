use std::sync::Arc;

use tessera_core::accounts::Accounts;
use tessera_core::config::ConfigError;
use tessera_core::gate::AuthenticationGate;
use tessera_core::lifecycle::SessionLifecycle;
use tessera_core::store::{SessionStore, UserStore};
use tessera_core::tokens::TokenCodec;

use crate::auth::password::Argon2Hasher;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, absent when running on the in-memory stores.
    pub pool: Option<tessera_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Login, refresh, liveness, and logout.
    pub lifecycle: Arc<SessionLifecycle>,
    /// Registration, credential checks, and profile reads.
    pub accounts: Arc<Accounts>,
    /// Bearer-token plus session-liveness check behind [`AuthUser`](crate::middleware::auth::AuthUser).
    pub gate: Arc<AuthenticationGate>,
}

impl AppState {
    /// Wire the session core over the given stores.
    ///
    /// Fails if the token configuration is unusable.
    pub fn new(
        config: ServerConfig,
        pool: Option<tessera_db::DbPool>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
    ) -> Result<Self, ConfigError> {
        let codec = Arc::new(TokenCodec::new(&config.token)?);
        let lifecycle = Arc::new(SessionLifecycle::new(sessions, Arc::clone(&users), codec));
        let accounts = Arc::new(Accounts::new(users, Arc::new(Argon2Hasher)));
        let gate = Arc::new(AuthenticationGate::new(Arc::clone(&lifecycle)));

        Ok(Self {
            pool,
            config: Arc::new(config),
            lifecycle,
            accounts,
            gate,
        })
    }
}
