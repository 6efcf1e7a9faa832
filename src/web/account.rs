//! Account endpoints: registration and the caller's own profile.

use super::api::ApiResponse;
use super::uploads::read_file_upload;
use crate::db::get_db_pool;
use crate::error::CoreError;
use crate::images;
use crate::middleware::ClientCtx;
use crate::user::{self, Registration, UserDto};
use actix_multipart::Multipart;
use actix_web::{get, post, put, web, Error, HttpResponse};
use serde::Deserialize;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(register)
        .service(me)
        .service(update_profile)
        .service(change_password)
        .service(update_avatar);
}

#[post("/api/auth/register")]
async fn register(form: web::Json<Registration>) -> Result<HttpResponse, Error> {
    let form = form.into_inner();
    form.validate()
        .map_err(|e| CoreError::InvalidArgument(e.to_string()))?;

    let db = get_db_pool();
    let created = user::register(db, &form).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserDto::from_model(&created))))
}

#[get("/api/users/me")]
async fn me(client: ClientCtx) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let user = user::find_by_id(db, user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserDto::from_model(&user))))
}

#[derive(Deserialize)]
struct ProfileForm {
    nickname: Option<String>,
}

#[put("/api/users/me")]
async fn update_profile(
    client: ClientCtx,
    form: web::Json<ProfileForm>,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let user = user::update_profile(db, user_id, form.nickname.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserDto::from_model(&user))))
}

#[derive(Deserialize)]
struct PasswordForm {
    old_password: String,
    new_password: String,
}

#[put("/api/users/me/password")]
async fn change_password(
    client: ClientCtx,
    form: web::Json<PasswordForm>,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    user::change_password(db, user_id, &form.old_password, &form.new_password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password updated successfully.")))
}

#[put("/api/users/me/avatar")]
async fn update_avatar(client: ClientCtx, payload: Multipart) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let upload = read_file_upload(payload).await?;
    let avatar_url = images::store_and_get_url(upload, "avatars").await?;
    let user = user::update_avatar_url(db, user_id, avatar_url).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserDto::from_model(&user))))
}
