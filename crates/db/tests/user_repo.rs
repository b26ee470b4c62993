//! Integration tests for the users repository and its store adapter.

use assert_matches::assert_matches;
use sqlx::PgPool;
use tessera_core::error::CoreError;
use tessera_core::roles::ROLE_USER;
use tessera_core::store::UserStore;
use tessera_core::user::NewUser;
use tessera_db::repositories::UserRepo;
use tessera_db::stores::PgUserStore;
use uuid::Uuid;

fn new_user(name: &str) -> NewUser {
    NewUser {
        id: Uuid::new_v4(),
        full_name: format!("{name} Example"),
        email: format!("{name}@test.com"),
        username: name.to_string(),
        phone: format!("+1-{name}"),
        country: "US".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role: ROLE_USER.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_applies_defaults(pool: PgPool) {
    let row = UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    assert_eq!(row.role, ROLE_USER);
    assert!(!row.is_verified);
    assert_eq!(row.created_at, row.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lookups_are_exact(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("bob")).await.unwrap();

    let by_id = UserRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(by_id.map(|u| u.username), Some("bob".to_string()));

    let by_email = UserRepo::find_by_email(&pool, "bob@test.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(created.id));

    let by_username = UserRepo::find_by_username(&pool, "bob").await.unwrap();
    assert_eq!(by_username.map(|u| u.id), Some(created.id));

    assert!(UserRepo::find_by_email(&pool, "BOB@test.com")
        .await
        .unwrap()
        .is_none());
    assert!(UserRepo::find_by_username(&pool, "Bob").await.unwrap().is_none());
    assert!(UserRepo::find_by_id(&pool, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints_map_to_conflict(pool: PgPool) {
    let store = PgUserStore::new(pool);
    store.create(new_user("carol")).await.unwrap();

    let mut same_email = new_user("carol2");
    same_email.email = "carol@test.com".to_string();
    let err = store.create(same_email).await.unwrap_err();
    assert_matches!(&err, CoreError::Conflict(msg) if msg.contains("uq_users_email"));

    let mut same_username = new_user("carol3");
    same_username.username = "carol".to_string();
    let err = store.create(same_username).await.unwrap_err();
    assert_matches!(&err, CoreError::Conflict(msg) if msg.contains("uq_users_username"));

    let mut same_phone = new_user("carol4");
    same_phone.phone = "+1-carol".to_string();
    let err = store.create(same_phone).await.unwrap_err();
    assert_matches!(&err, CoreError::Conflict(msg) if msg.contains("uq_users_phone"));
}
