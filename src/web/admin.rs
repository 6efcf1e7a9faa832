//! Moderation endpoints. Everything under /api/admin requires the admin
//! role; the role check is the boundary's job, the engine only enforces
//! the state machine.

use super::api::{ApiResponse, PagedResponse, PageQuery};
use crate::db::get_db_pool;
use crate::plants;
use crate::middleware::ClientCtx;
use actix_web::{get, put, web, Error, HttpResponse};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(pending_plants).service(review_plant);
}

/// Plants awaiting review.
#[get("/api/admin/plants/pending")]
async fn pending_plants(
    client: ClientCtx,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    client.require_admin()?;
    let db = get_db_pool();

    let (page, per_page) = query.resolve();
    let (items, total_pages, total_items) = plants::pending(db, page, per_page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PagedResponse::new(
        items,
        page,
        total_pages,
        total_items,
    ))))
}

#[derive(Deserialize)]
struct ReviewForm {
    status: String,
    review_notes: Option<String>,
}

/// Decide a pending plant's fate. The notes are stored as sent, approvals
/// included.
#[put("/api/admin/plants/{id}/status")]
async fn review_plant(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Json<ReviewForm>,
) -> Result<HttpResponse, Error> {
    client.require_admin()?;
    let db = get_db_pool();

    let decision = plants::parse_status(&form.status)?;
    let plant = plants::review(db, path.into_inner(), decision, form.review_notes.clone()).await?;
    let dto = plants::to_dto(db, &plant).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}
