//! Integration tests for the plant lifecycle engine:
//! status defaults and parsing, ownership gating, tag-set semantics, and
//! the review state machine.
mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use herbarium::error::CoreError;
use herbarium::orm::{plant_tags, plants};
use herbarium::plants::PlantInput;
use herbarium::tags;
use sea_orm::{entity::*, query::*, ColumnTrait, EntityTrait, QueryFilter};

fn input(name: &str) -> PlantInput {
    PlantInput {
        name: name.to_string(),
        ..Default::default()
    }
}

#[actix_rt::test]
#[serial]
async fn test_new_plant_defaults_to_draft() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");

    let plant = herbarium::plants::create(&db, &input("Moss Rose"), None, user.id)
        .await
        .expect("create");

    assert_eq!(plant.status, plants::Status::Draft);
    assert_eq!(plant.creator_id, user.id);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_explicit_status_is_parsed_exactly() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");

    let mut dto = input("Ginkgo");
    dto.status = Some("PENDING_REVIEW".to_string());
    let plant = herbarium::plants::create(&db, &dto, None, user.id)
        .await
        .expect("create");
    assert_eq!(plant.status, plants::Status::PendingReview);

    // Lowercase spelling is not accepted.
    let mut bad = input("Ginkgo 2");
    bad.status = Some("published".to_string());
    let err = herbarium::plants::create(&db, &bad, None, user.id)
        .await
        .expect_err("should reject unknown literal");
    assert!(matches!(err, CoreError::InvalidArgument(_)));

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_create_requires_existing_creator() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let err = herbarium::plants::create(&db, &input("Orphan"), None, 4242)
        .await
        .expect_err("missing creator");
    assert!(matches!(err, CoreError::NotFound(_)));

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_create_resolves_tags_and_drops_unknown_ids() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");
    let known = tags::find_or_create(&db, &["succulent".to_string()])
        .await
        .expect("tag");

    let mut dto = input("Echeveria");
    dto.tag_ids = Some(vec![known[0].id, 9999]);
    let plant = herbarium::plants::create(&db, &dto, None, user.id)
        .await
        .expect("create");

    let links = plant_tags::Entity::find()
        .filter(plant_tags::Column::PlantId.eq(plant.id))
        .all(&db)
        .await
        .expect("links");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].tag_id, known[0].id);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_update_is_creator_only_even_for_admins() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let owner = create_test_user(&db, "owner").await.expect("user");
    let admin = create_test_admin(&db, "admin").await.expect("admin");
    let plant = create_test_plant(&db, owner.id, "Fern", plants::Status::Draft)
        .await
        .expect("plant");

    let err = herbarium::plants::update(&db, plant.id, &input("Fern II"), None, admin.id)
        .await
        .expect_err("admin has no update override");
    assert!(matches!(err, CoreError::Forbidden(_)));

    let unchanged = herbarium::plants::get(&db, plant.id).await.expect("get");
    assert_eq!(unchanged.name, "Fern");

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_update_overwrites_all_scalars() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");

    let mut dto = input("Camellia");
    dto.scientific_name = Some("Camellia japonica".to_string());
    dto.flowering_period = Some("March-April".to_string());
    let plant = herbarium::plants::create(&db, &dto, None, user.id)
        .await
        .expect("create");

    // Full-resend semantics: an update that omits a scalar clears it.
    let updated = herbarium::plants::update(&db, plant.id, &input("Camellia"), None, user.id)
        .await
        .expect("update");
    assert_eq!(updated.scientific_name, None);
    assert_eq!(updated.flowering_period, None);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_update_tag_collection_semantics() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");
    let created = tags::find_or_create(&db, &["indoor".to_string()])
        .await
        .expect("tag");

    let mut dto = input("Monstera");
    dto.tag_ids = Some(vec![created[0].id]);
    let plant = herbarium::plants::create(&db, &dto, None, user.id)
        .await
        .expect("create");

    // A missing collection leaves the tag set untouched.
    herbarium::plants::update(&db, plant.id, &input("Monstera"), None, user.id)
        .await
        .expect("update");
    let links = plant_tags::Entity::find()
        .filter(plant_tags::Column::PlantId.eq(plant.id))
        .all(&db)
        .await
        .expect("links");
    assert_eq!(links.len(), 1);

    // A present-but-empty collection clears every tag.
    let mut clear = input("Monstera");
    clear.tag_ids = Some(Vec::new());
    herbarium::plants::update(&db, plant.id, &clear, None, user.id)
        .await
        .expect("update");
    let links = plant_tags::Entity::find()
        .filter(plant_tags::Column::PlantId.eq(plant.id))
        .all(&db)
        .await
        .expect("links");
    assert!(links.is_empty());

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_delete_is_creator_only() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let owner = create_test_user(&db, "owner").await.expect("user");
    let other = create_test_user(&db, "other").await.expect("user");
    let plant = create_test_plant(&db, owner.id, "Ivy", plants::Status::Published)
        .await
        .expect("plant");

    let err = herbarium::plants::delete(&db, plant.id, other.id)
        .await
        .expect_err("not the creator");
    assert!(matches!(err, CoreError::Forbidden(_)));

    herbarium::plants::delete(&db, plant.id, owner.id)
        .await
        .expect("delete");
    let gone = plants::Entity::find_by_id(plant.id)
        .one(&db)
        .await
        .expect("query");
    assert!(gone.is_none());

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_review_rejects_non_pending_plants() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");
    let plant = create_test_plant(&db, user.id, "Draft plant", plants::Status::Draft)
        .await
        .expect("plant");

    let err = herbarium::plants::review(
        &db,
        plant.id,
        plants::Status::Published,
        Some("looks good".to_string()),
    )
    .await
    .expect_err("not pending");
    assert!(matches!(err, CoreError::InvalidState(_)));

    // The row is untouched.
    let unchanged = herbarium::plants::get(&db, plant.id).await.expect("get");
    assert_eq!(unchanged.status, plants::Status::Draft);
    assert_eq!(unchanged.review_notes, None);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_review_applies_decision_and_notes() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");

    let pending = create_test_plant(&db, user.id, "Pending 1", plants::Status::PendingReview)
        .await
        .expect("plant");
    let approved = herbarium::plants::review(
        &db,
        pending.id,
        plants::Status::Published,
        Some("ok".to_string()),
    )
    .await
    .expect("review");
    // The decision is stored exactly, and the notes land even on approval.
    assert_eq!(approved.status, plants::Status::Published);
    assert_eq!(approved.review_notes.as_deref(), Some("ok"));

    let pending = create_test_plant(&db, user.id, "Pending 2", plants::Status::PendingReview)
        .await
        .expect("plant");
    let rejected = herbarium::plants::review(
        &db,
        pending.id,
        plants::Status::Rejected,
        Some("blurry photos".to_string()),
    )
    .await
    .expect("review");
    assert_eq!(rejected.status, plants::Status::Rejected);
    assert_eq!(rejected.review_notes.as_deref(), Some("blurry photos"));

    // A reviewed plant cannot be reviewed again.
    let err = herbarium::plants::review(&db, rejected.id, plants::Status::Published, None)
        .await
        .expect_err("no longer pending");
    assert!(matches!(err, CoreError::InvalidState(_)));

    cleanup_test_data(&db).await.expect("cleanup");
}
