//! User account management: registration, credentials, profile.

use crate::error::CoreError;
use crate::orm::users;
use crate::session;
use chrono::Utc;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public projection of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub nickname: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
}

impl UserDto {
    pub fn from_model(user: &users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct Registration {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 1, max = 64))]
    pub nickname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

pub async fn find_by_id(db: &DatabaseConnection, user_id: i32) -> Result<users::Model, CoreError> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("User not found with id: {}", user_id)))
}

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<users::Model, CoreError> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("User not found with username: {}", username)))
}

/// Register a new account. Username and email must both be unused.
pub async fn register(
    db: &DatabaseConnection,
    input: &Registration,
) -> Result<users::Model, CoreError> {
    let username_taken = users::Entity::find()
        .filter(users::Column::Username.eq(input.username.as_str()))
        .one(db)
        .await?
        .is_some();
    if username_taken {
        return Err(CoreError::InvalidArgument(
            "Username is already taken!".to_string(),
        ));
    }

    let email_taken = users::Entity::find()
        .filter(users::Column::Email.eq(input.email.as_str()))
        .one(db)
        .await?
        .is_some();
    if email_taken {
        return Err(CoreError::InvalidArgument(
            "Email is already in use!".to_string(),
        ));
    }

    let password_hash = session::hash_password(&input.password)
        .map_err(|e| CoreError::Unexpected(format!("Password hashing failed: {}", e)))?;

    let now = Utc::now().naive_utc();
    let user = users::ActiveModel {
        username: Set(input.username.clone()),
        nickname: Set(input.nickname.clone()),
        email: Set(Some(input.email.clone())),
        password_hash: Set(password_hash),
        role: Set(users::Role::User),
        status: Set(users::Status::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(user.insert(db).await?)
}

/// Check credentials for login. The same error covers an unknown username
/// and a wrong password so the response doesn't reveal which it was.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<users::Model, CoreError> {
    let user = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| CoreError::InvalidArgument("Invalid username or password.".to_string()))?;

    if !session::verify_password(password, &user.password_hash) {
        return Err(CoreError::InvalidArgument(
            "Invalid username or password.".to_string(),
        ));
    }

    if user.status == users::Status::Banned {
        return Err(CoreError::Forbidden("This account is banned.".to_string()));
    }

    Ok(user)
}

/// Change a user's password after verifying the old one.
pub async fn change_password(
    db: &DatabaseConnection,
    user_id: i32,
    old_password: &str,
    new_password: &str,
) -> Result<(), CoreError> {
    let user = find_by_id(db, user_id).await?;

    if !session::verify_password(old_password, &user.password_hash) {
        return Err(CoreError::InvalidArgument(
            "Incorrect old password.".to_string(),
        ));
    }

    let password_hash = session::hash_password(new_password)
        .map_err(|e| CoreError::Unexpected(format!("Password hashing failed: {}", e)))?;

    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(db).await?;

    Ok(())
}

/// Update the caller's nickname. A missing or blank nickname leaves the
/// profile untouched.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i32,
    nickname: Option<&str>,
) -> Result<users::Model, CoreError> {
    let user = find_by_id(db, user_id).await?;

    let nickname = match nickname {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => return Ok(user),
    };

    let mut active: users::ActiveModel = user.into();
    active.nickname = Set(nickname);
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}

/// Store a new avatar URL for the user.
pub async fn update_avatar_url(
    db: &DatabaseConnection,
    user_id: i32,
    avatar_url: String,
) -> Result<users::Model, CoreError> {
    let user = find_by_id(db, user_id).await?;

    let mut active: users::ActiveModel = user.into();
    active.avatar_url = Set(Some(avatar_url));
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}
