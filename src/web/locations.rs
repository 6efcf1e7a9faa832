//! Location lookups for the catalog's filters.

use super::api::ApiResponse;
use crate::db::get_db_pool;
use crate::locations;
use actix_web::{get, Error, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_areas);
}

/// Distinct area names, for the area filter dropdown.
#[get("/api/locations/areas")]
async fn list_areas() -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let areas = locations::distinct_areas(db)
        .await
        .map_err(crate::error::CoreError::Db)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(areas)))
}
