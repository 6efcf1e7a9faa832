//! Integration tests for the tag registry's find-or-create semantics.
mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use herbarium::orm::{plant_tags, tags as tag_rows};
use herbarium::plants::PlantInput;
use herbarium::tags;
use sea_orm::{entity::*, query::*, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[actix_rt::test]
#[serial]
async fn test_find_or_create_creates_then_reuses() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let first = tags::find_or_create(&db, &["succulent".to_string(), "indoor".to_string()])
        .await
        .expect("create");
    assert_eq!(first.len(), 2);

    // The second call sees the existing rows and reuses their ids.
    let second = tags::find_or_create(&db, &["succulent".to_string()])
        .await
        .expect("reuse");
    assert_eq!(second.len(), 1);
    let succulent = first.iter().find(|t| t.name == "succulent").unwrap();
    assert_eq!(second[0].id, succulent.id);

    let count = tag_rows::Entity::find().count(&db).await.expect("count");
    assert_eq!(count, 2);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_names_are_case_sensitive() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let lower = tags::find_or_create(&db, &["fern".to_string()])
        .await
        .expect("create");
    let upper = tags::find_or_create(&db, &["Fern".to_string()])
        .await
        .expect("create");

    assert_ne!(lower[0].id, upper[0].id);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_duplicate_names_in_one_call_resolve_once() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let resolved = tags::find_or_create(&db, &["moss".to_string(), "moss".to_string()])
        .await
        .expect("create");
    assert_eq!(resolved.len(), 1);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_two_plants_share_a_tag() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let user = create_test_user(&db, "grower").await.expect("user");
    let created = tags::find_or_create(&db, &["succulent".to_string(), "indoor".to_string()])
        .await
        .expect("tags");
    let tag_ids: Vec<i32> = created.iter().map(|t| t.id).collect();

    let mut first = PlantInput {
        name: "Echeveria".to_string(),
        ..Default::default()
    };
    first.tag_ids = Some(tag_ids.clone());
    let plant_a = herbarium::plants::create(&db, &first, None, user.id)
        .await
        .expect("create");

    let links = plant_tags::Entity::find()
        .filter(plant_tags::Column::PlantId.eq(plant_a.id))
        .all(&db)
        .await
        .expect("links");
    assert_eq!(links.len(), 2);

    let succulent_id = created.iter().find(|t| t.name == "succulent").unwrap().id;
    let mut second = PlantInput {
        name: "Haworthia".to_string(),
        ..Default::default()
    };
    second.tag_ids = Some(vec![succulent_id]);
    let plant_b = herbarium::plants::create(&db, &second, None, user.id)
        .await
        .expect("create");

    // Both plants point at the same tag row; no duplicate was created.
    let count = tag_rows::Entity::find().count(&db).await.expect("count");
    assert_eq!(count, 2);

    let link = plant_tags::Entity::find()
        .filter(plant_tags::Column::PlantId.eq(plant_b.id))
        .one(&db)
        .await
        .expect("query")
        .expect("link");
    assert_eq!(link.tag_id, succulent_id);

    cleanup_test_data(&db).await.expect("cleanup");
}
