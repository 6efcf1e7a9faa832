//! Integration tests for the image lifecycle: the two attach entry rules,
//! moderation defaults, and deletion authorization.
mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use herbarium::error::CoreError;
use herbarium::images::{self, Upload};
use herbarium::orm::{images as image_rows, plants};
use sea_orm::EntityTrait;

fn upload(name: &str) -> Upload {
    Upload {
        filename: name.to_string(),
        data: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

#[actix_rt::test]
#[serial]
async fn test_attach_requires_existing_plant() {
    init_test_storage();
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "uploader").await.expect("user");

    let err = images::attach(&db, 4242, user.id, upload("a.jpg"))
        .await
        .expect_err("missing plant");
    assert!(matches!(err, CoreError::NotFound(_)));

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_new_image_starts_pending_review() {
    init_test_storage();
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "uploader").await.expect("user");
    let plant = create_test_plant(&db, user.id, "Fern", plants::Status::Draft)
        .await
        .expect("plant");

    let image = images::attach(&db, plant.id, user.id, upload("fern.jpg"))
        .await
        .expect("attach");

    assert_eq!(image.status, image_rows::Status::PendingReview);
    assert_eq!(image.plant_id, plant.id);
    assert_eq!(image.uploader_id, user.id);
    assert!(image.image_url.contains("/uploads/plants/"));

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_additional_image_requires_published_plant() {
    init_test_storage();
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "uploader").await.expect("user");
    let draft = create_test_plant(&db, user.id, "Draft", plants::Status::Draft)
        .await
        .expect("plant");
    let published = create_test_plant(&db, user.id, "Published", plants::Status::Published)
        .await
        .expect("plant");

    let err = images::attach_to_published(&db, draft.id, user.id, upload("a.jpg"))
        .await
        .expect_err("draft plants take no additional images");
    assert!(matches!(err, CoreError::NotFound(_)));

    let image = images::attach_to_published(&db, published.id, user.id, upload("b.jpg"))
        .await
        .expect("attach");
    assert_eq!(image.plant_id, published.id);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_upload_without_extension_is_rejected() {
    init_test_storage();
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "uploader").await.expect("user");
    let plant = create_test_plant(&db, user.id, "Fern", plants::Status::Draft)
        .await
        .expect("plant");

    let err = images::attach(&db, plant.id, user.id, upload("no-extension"))
        .await
        .expect_err("filename has no extension");
    assert!(matches!(err, CoreError::InvalidArgument(_)));

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_delete_requires_uploader_or_admin() {
    init_test_storage();
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let uploader = create_test_user(&db, "uploader").await.expect("user");
    let stranger = create_test_user(&db, "stranger").await.expect("user");
    let admin = create_test_admin(&db, "admin").await.expect("admin");
    let plant = create_test_plant(&db, uploader.id, "Fern", plants::Status::Published)
        .await
        .expect("plant");

    let first = images::attach(&db, plant.id, uploader.id, upload("a.jpg"))
        .await
        .expect("attach");
    let second = images::attach(&db, plant.id, uploader.id, upload("b.jpg"))
        .await
        .expect("attach");

    let err = images::delete(&db, first.id, &principal_for(&stranger))
        .await
        .expect_err("not the uploader");
    assert!(matches!(err, CoreError::Forbidden(_)));

    images::delete(&db, first.id, &principal_for(&uploader))
        .await
        .expect("uploader delete");
    images::delete(&db, second.id, &principal_for(&admin))
        .await
        .expect("admin delete");

    let remaining = images::list(&db, plant.id).await.expect("list");
    assert!(remaining.is_empty());

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_delete_survives_missing_file() {
    init_test_storage();
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let uploader = create_test_user(&db, "uploader").await.expect("user");
    let plant = create_test_plant(&db, uploader.id, "Fern", plants::Status::Published)
        .await
        .expect("plant");

    let image = images::attach(&db, plant.id, uploader.id, upload("a.jpg"))
        .await
        .expect("attach");

    // Remove the stored file out from under the record; the record
    // deletion is best-effort on the file side and must still succeed.
    herbarium::storage::get_file_store()
        .delete(&image.image_url)
        .await
        .expect("file delete");

    images::delete(&db, image.id, &principal_for(&uploader))
        .await
        .expect("record delete");

    let gone = image_rows::Entity::find_by_id(image.id)
        .one(&db)
        .await
        .expect("query");
    assert!(gone.is_none());

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_list_returns_all_statuses() {
    init_test_storage();
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let uploader = create_test_user(&db, "uploader").await.expect("user");
    let plant = create_test_plant(&db, uploader.id, "Fern", plants::Status::Published)
        .await
        .expect("plant");

    let image = images::attach(&db, plant.id, uploader.id, upload("a.jpg"))
        .await
        .expect("attach");
    images::attach(&db, plant.id, uploader.id, upload("b.jpg"))
        .await
        .expect("attach");

    // Flip one image to rejected; the listing still returns both.
    let mut active: image_rows::ActiveModel = image.into();
    active.status = sea_orm::ActiveValue::Set(image_rows::Status::Rejected);
    sea_orm::ActiveModelTrait::update(active, &db)
        .await
        .expect("update");

    let all = images::list(&db, plant.id).await.expect("list");
    assert_eq!(all.len(), 2);

    cleanup_test_data(&db).await.expect("cleanup");
}
