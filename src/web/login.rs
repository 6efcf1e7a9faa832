//! Login endpoint: credential check plus session-cookie binding.

use super::api::ApiResponse;
use crate::db::get_db_pool;
use crate::session;
use crate::user::{self, UserDto};
use actix_session::Session;
use actix_web::{post, web, Error, HttpResponse};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(login);
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[post("/api/auth/login")]
async fn login(session: Session, form: web::Json<LoginForm>) -> Result<HttpResponse, Error> {
    let db = get_db_pool();

    let user = user::authenticate(db, &form.username, &form.password).await?;
    session::log_in(&session, user.id)?;

    log::info!("User {} logged in", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserDto::from_model(&user))))
}
