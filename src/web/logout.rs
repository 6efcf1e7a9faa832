//! Logout endpoint.

use super::api::ApiResponse;
use crate::session;
use actix_session::Session;
use actix_web::{post, Error, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(logout);
}

#[post("/api/auth/logout")]
async fn logout(session: Session) -> Result<HttpResponse, Error> {
    session::log_out(&session);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Logged out.")))
}
