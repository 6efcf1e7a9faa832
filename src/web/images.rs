//! Image endpoints: uploads, listing, and deletion.

use super::api::ApiResponse;
use super::uploads::read_file_upload;
use crate::db::get_db_pool;
use crate::images;
use crate::middleware::ClientCtx;
use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, Error, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(upload_image)
        .service(upload_additional_image)
        .service(list_images)
        .service(delete_image);
}

/// Attach an image to a plant in any status.
#[post("/api/plants/{plant_id}/images")]
async fn upload_image(
    client: ClientCtx,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let upload = read_file_upload(payload).await?;
    let image = images::attach(db, path.into_inner(), user_id, upload).await?;

    let uploader = crate::user::find_by_id(db, user_id).await?;
    let dto = images::ImageDto::from_model(&image, Some(&uploader));

    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}

/// Attach an additional image; the plant must already be published.
#[post("/api/plants/{plant_id}/additional-images")]
async fn upload_additional_image(
    client: ClientCtx,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    let db = get_db_pool();

    let upload = read_file_upload(payload).await?;
    let image = images::attach_to_published(db, path.into_inner(), user_id, upload).await?;

    let uploader = crate::user::find_by_id(db, user_id).await?;
    let dto = images::ImageDto::from_model(&image, Some(&uploader));

    Ok(HttpResponse::Ok().json(ApiResponse::success(dto)))
}

/// All of a plant's images, regardless of moderation status.
#[get("/api/plants/{plant_id}/images")]
async fn list_images(path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let db = get_db_pool();
    let dtos = images::list_dtos(db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(dtos)))
}

#[delete("/api/images/{image_id}")]
async fn delete_image(client: ClientCtx, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let principal = client.require_principal()?;
    let db = get_db_pool();

    images::delete(db, path.into_inner(), principal).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Image deleted successfully.")))
}
