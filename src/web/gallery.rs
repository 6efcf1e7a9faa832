//! The author's private gallery: create, edit, and delete their own
//! plants in any status.

use super::api::{ApiResponse, PagedResponse, PageQuery};
use super::uploads::read_plant_form;
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::plants;
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, Error, HttpResponse};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_my_plants)
        .service(create_plant)
        .service(view_my_plant)
        .service(update_plant)
        .service(delete_plant);
}

#[derive(Deserialize)]
struct GalleryQuery {
    status: Option<String>,
    page: Option<u64>,
    per_page: Option<u64>,
}

/// The caller's plants, any status, optionally narrowed to one.
#[get("/api/my-gallery")]
async fn list_my_plants(
    client: ClientCtx,
    query: web::Query<GalleryQuery>,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let status = match query.status.as_deref() {
        Some(value) if !value.is_empty() => Some(plants::parse_status(value)?),
        _ => None,
    };

    let paging = PageQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let (page, per_page) = paging.resolve();

    let (items, total_pages, total_items) =
        plants::by_creator(db, user_id, status, page, per_page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PagedResponse::new(
        items,
        page,
        total_pages,
        total_items,
    ))))
}

#[post("/api/my-gallery")]
async fn create_plant(client: ClientCtx, payload: Multipart) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let form = read_plant_form(payload).await?;
    let plant = plants::create(db, &form.plant, form.main_image, user_id).await?;
    let dto = plants::to_dto(db, &plant).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}

#[get("/api/my-gallery/{id}")]
async fn view_my_plant(client: ClientCtx, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let plant = plants::get_by_creator(db, path.into_inner(), user_id).await?;
    let dto = plants::to_dto(db, &plant).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}

#[put("/api/my-gallery/{id}")]
async fn update_plant(
    client: ClientCtx,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let form = read_plant_form(payload).await?;
    let plant = plants::update(db, path.into_inner(), &form.plant, form.main_image, user_id).await?;
    let dto = plants::to_dto(db, &plant).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}

#[delete("/api/my-gallery/{id}")]
async fn delete_plant(client: ClientCtx, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    plants::delete(db, path.into_inner(), user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Plant deleted successfully.")))
}
