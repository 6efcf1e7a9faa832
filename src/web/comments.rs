//! Comment endpoints: the per-plant tree, the caller's history, and soft
//! deletion.

use super::api::{ApiResponse, PagedResponse, PageQuery};
use crate::comments;
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use actix_web::{delete, get, post, web, Error, HttpResponse};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_comments)
        .service(create_comment)
        .service(my_comments)
        .service(delete_comment);
}

/// Top-level comments for a plant, newest first, replies nested.
#[get("/api/plants/{plant_id}/comments")]
async fn list_comments(
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let (page, per_page) = query.resolve();

    let (items, total_pages, total_items) =
        comments::list(db, path.into_inner(), page, per_page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PagedResponse::new(
        items,
        page,
        total_pages,
        total_items,
    ))))
}

#[derive(Deserialize)]
struct CommentForm {
    content: String,
    parent_comment_id: Option<i32>,
}

#[post("/api/plants/{plant_id}/comments")]
async fn create_comment(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Json<CommentForm>,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let comment = comments::create(
        db,
        path.into_inner(),
        user_id,
        &form.content,
        form.parent_comment_id,
    )
    .await?;

    let dto = comments::to_dto(db, &comment).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}

/// The caller's comment history across all plants.
#[get("/api/my-comments")]
async fn my_comments(client: ClientCtx, query: web::Query<PageQuery>) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();
    let (page, per_page) = query.resolve();

    let (items, total_pages, total_items) =
        comments::list_by_user(db, user_id, page, per_page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PagedResponse::new(
        items,
        page,
        total_pages,
        total_items,
    ))))
}

#[delete("/api/comments/{id}")]
async fn delete_comment(client: ClientCtx, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let principal = client.require_principal()?;
    let db = get_db_pool();

    comments::delete(db, path.into_inner(), principal).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment deleted successfully.")))
}
