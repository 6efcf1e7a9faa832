//! Public tag listing.

use super::api::ApiResponse;
use crate::db::get_db_pool;
use crate::tags::{self, TagDto};
use actix_web::{get, Error, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_tags);
}

#[get("/api/tags")]
async fn list_tags() -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let tags = tags::all(db)
        .await
        .map_err(crate::error::CoreError::Db)?;
    let dtos: Vec<TagDto> = tags.iter().map(TagDto::from_model).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(dtos)))
}
