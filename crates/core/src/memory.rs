//! In-memory store adapters for tests and local development.
//!
//! Sessions and users are held in [`DashMap`]s, so concurrent requests only
//! contend on the shard holding the row they touch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{CoreError, CoreResult};
use crate::session::{NewSession, Session};
use crate::store::{SessionStore, UserStore};
use crate::types::{SessionId, Timestamp, UserId};
use crate::user::{NewUser, User};

/// Session store backed by a concurrent hash map.
///
/// [`set_unavailable`](Self::set_unavailable) makes every call fail with
/// `StoreUnavailable`, which lets tests exercise outage handling.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, Session>,
    unavailable: AtomicBool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored sessions, revoked and expired included.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn check_available(&self) -> CoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::StoreUnavailable(
                "session store is unavailable".into(),
            ));
        }
        Ok(())
    }

    fn revoke_matching<F>(&self, at: Timestamp, predicate: F) -> u64
    where
        F: Fn(&Session) -> bool,
    {
        let mut count = 0;
        for mut entry in self.sessions.iter_mut() {
            let session = entry.value_mut();
            if session.revoked_at.is_none() && predicate(session) {
                session.revoked_at = Some(at);
                count += 1;
            }
        }
        count
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, input: NewSession) -> CoreResult<Session> {
        self.check_available()?;
        match self.sessions.entry(input.id) {
            Entry::Occupied(_) => Err(CoreError::Conflict(format!(
                "session {} already exists",
                input.id
            ))),
            Entry::Vacant(slot) => {
                let session = input.into_session();
                slot.insert(session.clone());
                Ok(session)
            }
        }
    }

    async fn get_by_id(&self, id: SessionId) -> CoreResult<Session> {
        self.check_available()?;
        self.sessions
            .get(&id)
            .map(|s| s.value().clone())
            .ok_or_else(|| CoreError::session_not_found(id))
    }

    async fn list_active_for_user(
        &self,
        user_id: UserId,
        now: Timestamp,
    ) -> CoreResult<Vec<Session>> {
        self.check_available()?;
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.is_active_at(now))
            .map(|s| s.value().clone())
            .collect();
        sessions.sort_by(|a, b| b.last_used_at.cmp(&a.last_used_at));
        Ok(sessions)
    }

    async fn revoke(&self, id: SessionId, at: Timestamp) -> CoreResult<bool> {
        self.check_available()?;
        Ok(match self.sessions.get_mut(&id) {
            Some(mut session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(at);
                true
            }
            _ => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: UserId, at: Timestamp) -> CoreResult<u64> {
        self.check_available()?;
        Ok(self.revoke_matching(at, |s| s.user_id == user_id))
    }

    async fn revoke_all_except(
        &self,
        user_id: UserId,
        keep_id: SessionId,
        at: Timestamp,
    ) -> CoreResult<u64> {
        self.check_available()?;
        Ok(self.revoke_matching(at, |s| s.user_id == user_id && s.id != keep_id))
    }

    async fn touch_last_used(&self, id: SessionId, at: Timestamp) -> CoreResult<()> {
        self.check_available()?;
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.last_used_at = at;
        }
        Ok(())
    }
}

/// User store backed by a concurrent hash map.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, User>,
    /// Serializes inserts so the uniqueness checks and the insert are atomic.
    create_lock: Mutex<()>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_by<F>(&self, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.users
            .iter()
            .find(|u| predicate(u.value()))
            .map(|u| u.value().clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, input: NewUser) -> CoreResult<User> {
        let _guard = self
            .create_lock
            .lock()
            .map_err(|_| CoreError::Internal("user store lock poisoned".into()))?;

        let duplicate = self.users.iter().find_map(|u| {
            if u.id == input.id {
                Some("pk_users")
            } else if u.email == input.email {
                Some("uq_users_email")
            } else if u.username == input.username {
                Some("uq_users_username")
            } else if u.phone == input.phone {
                Some("uq_users_phone")
            } else {
                None
            }
        });
        if let Some(constraint) = duplicate {
            return Err(CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            )));
        }

        let now = chrono::Utc::now();
        let user = User {
            id: input.id,
            full_name: input.full_name,
            email: input.email,
            username: input.username,
            phone: input.phone,
            country: input.country,
            password_hash: input.password_hash,
            role: input.role,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> CoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        Ok(self.find_by(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<User>> {
        Ok(self.find_by(|u| u.username == username))
    }
}
