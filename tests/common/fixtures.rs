//! Test fixtures for creating test data
#![allow(dead_code)]

use chrono::Utc;
use herbarium::middleware::Principal;
use herbarium::orm::{comments, plants, users};
use herbarium::storage::local::LocalStore;
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};
use std::sync::Once;

static STORAGE_INIT: Once = Once::new();

/// Point the global file store at a throwaway directory. The directory is
/// intentionally kept for the life of the test process.
pub fn init_test_storage() {
    STORAGE_INIT.call_once(|| {
        let dir = tempfile::tempdir()
            .expect("Failed to create temp storage dir")
            .into_path();
        let store = LocalStore::new(dir, "http://localhost:8080".to_string())
            .expect("Failed to initialize test storage");
        herbarium::storage::init_file_store(Box::new(store));
    });
}

async fn create_user_with_role(
    db: &DatabaseConnection,
    username: &str,
    role: users::Role,
) -> Result<users::Model, DbErr> {
    let password_hash = herbarium::session::hash_password("password123")
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    let now = Utc::now().naive_utc();
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        nickname: Set(username.to_string()),
        password_hash: Set(password_hash),
        email: Set(Some(format!("{}@test.com", username))),
        role: Set(role),
        status: Set(users::Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    user.insert(db).await
}

/// Create a regular test user with the password "password123".
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<users::Model, DbErr> {
    create_user_with_role(db, username, users::Role::User).await
}

/// Create an admin test user with the password "password123".
pub async fn create_test_admin(
    db: &DatabaseConnection,
    username: &str,
) -> Result<users::Model, DbErr> {
    create_user_with_role(db, username, users::Role::Admin).await
}

/// Create a bare plant row directly, bypassing the engine.
pub async fn create_test_plant(
    db: &DatabaseConnection,
    creator_id: i32,
    name: &str,
    status: plants::Status,
) -> Result<plants::Model, DbErr> {
    let now = Utc::now().naive_utc();
    let plant = plants::ActiveModel {
        name: Set(name.to_string()),
        status: Set(status),
        creator_id: Set(creator_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    plant.insert(db).await
}

/// Insert a comment row with an explicit timestamp, for ordering tests.
pub async fn create_test_comment(
    db: &DatabaseConnection,
    plant_id: i32,
    user_id: Option<i32>,
    parent_comment_id: Option<i32>,
    content: &str,
    created_at: chrono::NaiveDateTime,
) -> Result<comments::Model, DbErr> {
    let comment = comments::ActiveModel {
        plant_id: Set(plant_id),
        user_id: Set(user_id),
        parent_comment_id: Set(parent_comment_id),
        content: Set(content.to_string()),
        created_at: Set(created_at),
        ..Default::default()
    };
    comment.insert(db).await
}

/// The principal a logged-in session would resolve for this user.
pub fn principal_for(user: &users::Model) -> Principal {
    Principal {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
    }
}
