//! Public catalog endpoints: browsing, search, and the map projection.

use super::api::{ApiResponse, PagedResponse, PageQuery};
use crate::db::get_db_pool;
use crate::plants::{self, PlantFilters};
use actix_web::{get, web, Error, HttpResponse};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_published)
        .service(search_plants)
        .service(map_points)
        .service(view_plant);
}

#[derive(Deserialize)]
struct CatalogQuery {
    tag_id: Option<i32>,
    period: Option<String>,
    area_name: Option<String>,
    page: Option<u64>,
    per_page: Option<u64>,
}

/// Published plants, filtered by the AND of whichever filters are given.
#[get("/api/plants")]
async fn list_published(query: web::Query<CatalogQuery>) -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let filters = PlantFilters {
        tag_id: query.tag_id,
        period: query.period.clone(),
        area_name: query.area_name.clone(),
    };
    let paging = PageQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let (page, per_page) = paging.resolve();

    let (items, total_pages, total_items) =
        plants::published(db, &filters, page, per_page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PagedResponse::new(
        items,
        page,
        total_pages,
        total_items,
    ))))
}

#[derive(Deserialize)]
struct SearchQuery {
    query: String,
    page: Option<u64>,
    per_page: Option<u64>,
}

/// Case-insensitive name search over published plants.
#[get("/api/plants/search")]
async fn search_plants(query: web::Query<SearchQuery>) -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let paging = PageQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let (page, per_page) = paging.resolve();

    let (items, total_pages, total_items) =
        plants::search(db, &query.query, page, per_page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PagedResponse::new(
        items,
        page,
        total_pages,
        total_items,
    ))))
}

/// One marker per (published plant, location) pair.
#[get("/api/plants/map-points")]
async fn map_points() -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let points = plants::map_points(db).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(points)))
}

#[get("/api/plants/{id}")]
async fn view_plant(path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let plant = plants::get(db, path.into_inner()).await?;
    let dto = plants::to_dto(db, &plant).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}
