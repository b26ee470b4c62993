//! Registration and credential checks.
//!
//! This is the collaborator that turns an identifier + password into a
//! verified [`User`] before [`SessionLifecycle::login`](crate::lifecycle::SessionLifecycle::login)
//! opens a session.

use std::sync::{Arc, OnceLock};

use uuid::Uuid;
use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::roles::ROLE_USER;
use crate::store::{CredentialHasher, UserStore};
use crate::types::UserId;
use crate::user::{NewAccount, NewUser, User, UserProfile};

/// Password verified against a throwaway hash when the identifier is unknown.
const DECOY_PASSWORD: &str = "decoy-password-never-matches";

pub struct Accounts {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    decoy_hash: OnceLock<String>,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            users,
            hasher,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Validate, hash the password, and insert a new user with the default role.
    pub async fn register(&self, input: NewAccount) -> CoreResult<UserProfile> {
        input.validate()?;

        let password_hash = self.hasher.hash(&input.password)?;
        let user = self
            .users
            .create(NewUser {
                id: Uuid::new_v4(),
                full_name: input.full_name,
                email: input.email,
                username: input.username,
                phone: input.phone,
                country: input.country,
                password_hash,
                role: ROLE_USER.to_string(),
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(UserProfile::from(&user))
    }

    /// Resolve `identification` as an email first, then as a username, and
    /// check the password.
    ///
    /// Unknown identifiers and wrong passwords both yield
    /// [`CoreError::InvalidCredential`].
    pub async fn authenticate(&self, identification: &str, password: &str) -> CoreResult<User> {
        let user = match self.users.find_by_email(identification).await? {
            Some(user) => Some(user),
            None => self.users.find_by_username(identification).await?,
        };

        let Some(user) = user else {
            self.verify_decoy(password);
            tracing::debug!("Login attempt for unknown identifier");
            return Err(CoreError::InvalidCredential);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(CoreError::InvalidCredential);
        }

        Ok(user)
    }

    /// Run one password verification against a hash no real user has, so an
    /// unknown identifier costs as much as a wrong password.
    fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.hasher.hash(DECOY_PASSWORD).unwrap_or_default());
        if let Err(err) = self.hasher.verify(password, decoy) {
            tracing::debug!(error = %err, "Decoy verification failed");
        }
    }

    pub async fn profile(&self, user_id: UserId) -> CoreResult<UserProfile> {
        let user = self.find(user_id).await?;
        Ok(UserProfile::from(&user))
    }

    pub async fn is_verified(&self, user_id: UserId) -> CoreResult<bool> {
        Ok(self.find(user_id).await?.is_verified)
    }

    async fn find(&self, user_id: UserId) -> CoreResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::user_not_found(user_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;

    use super::*;
    use crate::memory::MemoryUserStore;

    /// Reversible stand-in for a real password hasher.
    struct PlainHasher;

    impl CredentialHasher for PlainHasher {
        fn hash(&self, password: &str) -> CoreResult<String> {
            Ok(format!("plain${password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> CoreResult<bool> {
            Ok(hash == format!("plain${password}"))
        }
    }

    /// Wraps [`PlainHasher`] and counts verifications.
    #[derive(Default)]
    struct CountingHasher {
        verifications: AtomicUsize,
    }

    impl CredentialHasher for CountingHasher {
        fn hash(&self, password: &str) -> CoreResult<String> {
            PlainHasher.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> CoreResult<bool> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            PlainHasher.verify(password, hash)
        }
    }

    fn accounts() -> Accounts {
        Accounts::new(Arc::new(MemoryUserStore::new()), Arc::new(PlainHasher))
    }

    fn account(username: &str) -> NewAccount {
        NewAccount {
            full_name: "Test User".into(),
            email: format!("{username}@test.com"),
            username: username.to_string(),
            password: "long-enough-password".into(),
            phone: format!("+64-{username}"),
            country: "NZ".into(),
        }
    }

    #[tokio::test]
    async fn register_returns_profile_with_default_role() {
        let accounts = accounts();
        let profile = accounts.register(account("newbie")).await.unwrap();

        assert_eq!(profile.username, "newbie");
        assert_eq!(profile.role, ROLE_USER);
        assert!(!profile.is_verified);
        assert!(!accounts.is_verified(profile.id).await.unwrap());
    }

    #[tokio::test]
    async fn register_rejects_invalid_input() {
        let accounts = accounts();
        let mut input = account("shorty");
        input.password = "short".into();

        assert_matches!(accounts.register(input).await, Err(CoreError::Validation(msg)) => {
            assert!(msg.contains("password"));
        });
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let accounts = accounts();
        accounts.register(account("dupe")).await.unwrap();
        assert_matches!(
            accounts.register(account("dupe")).await,
            Err(CoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn authenticate_accepts_email_or_username() {
        let accounts = accounts();
        let profile = accounts.register(account("eve")).await.unwrap();

        let by_email = accounts
            .authenticate("eve@test.com", "long-enough-password")
            .await
            .unwrap();
        let by_username = accounts
            .authenticate("eve", "long-enough-password")
            .await
            .unwrap();
        assert_eq!(by_email.id, profile.id);
        assert_eq!(by_username.id, profile.id);
    }

    #[tokio::test]
    async fn authenticate_does_not_reveal_which_field_was_wrong() {
        let accounts = accounts();
        accounts.register(account("frank")).await.unwrap();

        assert_matches!(
            accounts.authenticate("frank", "wrong-password").await,
            Err(CoreError::InvalidCredential)
        );
        assert_matches!(
            accounts.authenticate("nobody", "long-enough-password").await,
            Err(CoreError::InvalidCredential)
        );
    }

    #[tokio::test]
    async fn unknown_identifier_still_verifies_a_password() {
        let hasher = Arc::new(CountingHasher::default());
        let accounts = Accounts::new(Arc::new(MemoryUserStore::new()), hasher.clone());
        accounts.register(account("grace")).await.unwrap();

        assert_matches!(
            accounts.authenticate("grace", "wrong-password").await,
            Err(CoreError::InvalidCredential)
        );
        assert_eq!(hasher.verifications.load(Ordering::SeqCst), 1);

        assert_matches!(
            accounts.authenticate("nobody", "wrong-password").await,
            Err(CoreError::InvalidCredential)
        );
        assert_eq!(hasher.verifications.load(Ordering::SeqCst), 2);

        // A decoy password never unlocks an unknown identifier.
        assert_matches!(
            accounts.authenticate("nobody", DECOY_PASSWORD).await,
            Err(CoreError::InvalidCredential)
        );
        assert_eq!(hasher.verifications.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn profile_of_unknown_user_is_not_found() {
        let accounts = accounts();
        assert_matches!(
            accounts.profile(Uuid::new_v4()).await,
            Err(CoreError::NotFound { entity: "user", .. })
        );
    }
}
