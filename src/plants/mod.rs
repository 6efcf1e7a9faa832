//! Plant lifecycle engine.
//!
//! Owns the status state machine and the authorization gating on every
//! mutation, and coordinates the tag, location, and image components so a
//! plant's relational graph stays consistent across create, update, delete,
//! and review. Each mutating operation runs as one transaction.

use crate::error::CoreError;
use crate::images::{ImageDto, Upload};
use crate::orm::{plant_locations, plant_tags, plants, users};
use crate::tags::TagDto;
use crate::user::UserDto;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};

/// A submitted place for a plant. Resolved against the location registry
/// by the exact (area_name, specific_name) pair.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationInput {
    pub area_name: String,
    pub specific_name: String,
    pub map_coord_x: Option<f32>,
    pub map_coord_y: Option<f32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Caller-supplied plant fields, shared by create and update.
///
/// Updates use full-resend semantics: every scalar is overwritten with
/// what arrives here, present or not. `tag_ids` and `locations` are
/// special-cased; see `update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantInput {
    #[serde(default)]
    pub name: String,
    pub scientific_name: Option<String>,
    pub family_genus: Option<String>,
    pub description: Option<String>,
    pub flowering_period: Option<String>,
    pub status: Option<String>,
    pub tag_ids: Option<Vec<i32>>,
    pub locations: Option<Vec<LocationInput>>,
}

/// Optional filters for the public catalog listing, AND-combined.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantFilters {
    pub tag_id: Option<i32>,
    pub period: Option<String>,
    pub area_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationDto {
    pub id: i32,
    pub area_name: String,
    pub specific_name: String,
    pub map_coord_x: Option<f32>,
    pub map_coord_y: Option<f32>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlantDto {
    pub id: i32,
    pub name: String,
    pub scientific_name: Option<String>,
    pub family_genus: Option<String>,
    pub main_image_url: Option<String>,
    pub flowering_period: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub review_notes: Option<String>,
    pub creator: Option<UserDto>,
    pub tags: Vec<TagDto>,
    pub locations: Vec<LocationDto>,
    pub images: Vec<ImageDto>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// One map marker per (published plant, location) pair; a plant growing in
/// three places yields three points.
#[derive(Debug, Serialize)]
pub struct MapPointDto {
    pub plant_id: i32,
    pub name: String,
    pub scientific_name: Option<String>,
    pub tags: Vec<TagDto>,
    pub main_image_url: Option<String>,
    pub map_coord_x: Option<f32>,
    pub map_coord_y: Option<f32>,
}

/// Parse a caller-supplied status literal or fail with InvalidArgument.
pub fn parse_status(value: &str) -> Result<plants::Status, CoreError> {
    plants::Status::parse(value)
        .ok_or_else(|| CoreError::InvalidArgument(format!("Invalid plant status: {}", value)))
}

pub async fn get(db: &DatabaseConnection, plant_id: i32) -> Result<plants::Model, CoreError> {
    plants::Entity::find_by_id(plant_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Plant not found with id: {}", plant_id)))
}

/// Owner-scoped fetch for the private gallery.
pub async fn get_by_creator(
    db: &DatabaseConnection,
    plant_id: i32,
    creator_id: i32,
) -> Result<plants::Model, CoreError> {
    plants::Entity::find_by_id(plant_id)
        .filter(plants::Column::CreatorId.eq(creator_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound(format!(
                "Plant not found with id: {} or you are not the creator.",
                plant_id
            ))
        })
}

/// Create a plant record.
///
/// Status defaults to DRAFT when none is supplied; a supplied literal is
/// parsed exactly, with no validation that the target status is reachable
/// from "new". Tag ids that don't resolve are silently dropped.
pub async fn create(
    db: &DatabaseConnection,
    input: &PlantInput,
    main_image: Option<Upload>,
    creator_id: i32,
) -> Result<plants::Model, CoreError> {
    let creator = users::Entity::find_by_id(creator_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("User not found with id: {}", creator_id)))?;

    let status = match input.status.as_deref() {
        Some(value) if !value.is_empty() => parse_status(value)?,
        _ => plants::Status::Draft,
    };

    // Byte storage happens before the transaction; it is not transactional
    // and its URL is stored verbatim.
    let main_image_url = match main_image {
        Some(upload) => Some(crate::images::store_and_get_url(upload, "plants").await?),
        None => None,
    };

    let txn = db.begin().await?;

    let now = Utc::now().naive_utc();
    let plant = plants::ActiveModel {
        name: Set(input.name.clone()),
        scientific_name: Set(input.scientific_name.clone()),
        family_genus: Set(input.family_genus.clone()),
        description: Set(input.description.clone()),
        flowering_period: Set(input.flowering_period.clone()),
        main_image_url: Set(main_image_url),
        status: Set(status),
        creator_id: Set(creator.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(tag_ids) = &input.tag_ids {
        if !tag_ids.is_empty() {
            link_tags(&txn, plant.id, tag_ids).await?;
        }
    }

    if let Some(locations) = &input.locations {
        create_plant_locations(&txn, plant.id, locations).await?;
    }

    txn.commit().await?;
    Ok(plant)
}

/// Update a plant. Only the creator may do this; administrators have no
/// override here, their lever is `review`.
pub async fn update(
    db: &DatabaseConnection,
    plant_id: i32,
    input: &PlantInput,
    main_image: Option<Upload>,
    requester_id: i32,
) -> Result<plants::Model, CoreError> {
    let plant = get(db, plant_id).await?;

    if plant.creator_id != requester_id {
        return Err(CoreError::Forbidden(
            "User is not authorized to edit this plant.".to_string(),
        ));
    }

    let main_image_url = match main_image {
        Some(upload) => Some(crate::images::store_and_get_url(upload, "plants").await?),
        None => None,
    };

    let txn = db.begin().await?;

    let mut active: plants::ActiveModel = plant.into();
    if let Some(url) = main_image_url {
        active.main_image_url = Set(Some(url));
    }

    // Full-resend semantics: scalars are overwritten with whatever the
    // caller sent, omitted fields included.
    active.name = Set(input.name.clone());
    active.scientific_name = Set(input.scientific_name.clone());
    active.family_genus = Set(input.family_genus.clone());
    active.description = Set(input.description.clone());
    active.flowering_period = Set(input.flowering_period.clone());

    if let Some(value) = input.status.as_deref() {
        if !value.is_empty() {
            active.status = Set(parse_status(value)?);
        }
    }

    active.updated_at = Set(Utc::now().naive_utc());
    let plant = active.update(&txn).await?;

    // Tag links are replaced wholesale when the id collection is present;
    // an empty collection clears all tags, a missing one leaves them be.
    if let Some(tag_ids) = &input.tag_ids {
        plant_tags::Entity::delete_many()
            .filter(plant_tags::Column::PlantId.eq(plant.id))
            .exec(&txn)
            .await?;
        link_tags(&txn, plant.id, tag_ids).await?;
    }

    // Location replacement: delete every junction row for the plant, then
    // re-run the create-or-reuse protocol against the new list. The whole
    // sequence shares this transaction, so readers never observe the
    // intermediate empty set.
    plant_locations::Entity::delete_many()
        .filter(plant_locations::Column::PlantId.eq(plant.id))
        .exec(&txn)
        .await?;

    if let Some(locations) = &input.locations {
        create_plant_locations(&txn, plant.id, locations).await?;
    }

    txn.commit().await?;
    Ok(plant)
}

/// Delete a plant and its location links. Creator only.
pub async fn delete(
    db: &DatabaseConnection,
    plant_id: i32,
    requester_id: i32,
) -> Result<(), CoreError> {
    let plant = get(db, plant_id).await?;

    if plant.creator_id != requester_id {
        return Err(CoreError::Forbidden(
            "User is not authorized to delete this plant.".to_string(),
        ));
    }

    let txn = db.begin().await?;

    plant_locations::Entity::delete_many()
        .filter(plant_locations::Column::PlantId.eq(plant.id))
        .exec(&txn)
        .await?;

    // Images, tag links and comments cascade with the row.
    plants::Entity::delete_by_id(plant.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Review a pending plant: set the decided status and store the review
/// notes unconditionally, approvals included.
///
/// Only a plant sitting in PENDING_REVIEW can be reviewed. Admin gating
/// happens at the boundary, not here.
pub async fn review(
    db: &DatabaseConnection,
    plant_id: i32,
    decision: plants::Status,
    review_notes: Option<String>,
) -> Result<plants::Model, CoreError> {
    let plant = get(db, plant_id).await?;

    if plant.status != plants::Status::PendingReview {
        return Err(CoreError::InvalidState(
            "Only plants with PENDING_REVIEW status can be reviewed.".to_string(),
        ));
    }

    let mut active: plants::ActiveModel = plant.into();
    active.status = Set(decision);
    active.review_notes = Set(review_notes);
    active.updated_at = Set(Utc::now().naive_utc());

    Ok(active.update(db).await?)
}

/// Published plants matching the AND of whichever filters are present.
pub async fn published(
    db: &DatabaseConnection,
    filters: &PlantFilters,
    page: u64,
    per_page: u64,
) -> Result<(Vec<PlantDto>, u64, u64), CoreError> {
    let mut query = plants::Entity::find().filter(plants::Column::Status.eq(plants::Status::Published));

    if let Some(tag_id) = filters.tag_id {
        let plant_ids: Vec<i32> = plant_tags::Entity::find()
            .filter(plant_tags::Column::TagId.eq(tag_id))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.plant_id)
            .collect();
        query = query.filter(plants::Column::Id.is_in(plant_ids));
    }

    if let Some(period) = filters.period.as_deref() {
        query = query.filter(plants::Column::FloweringPeriod.contains(period));
    }

    if let Some(area_name) = filters.area_name.as_deref() {
        let location_ids: Vec<i32> = crate::orm::locations::Entity::find()
            .filter(crate::orm::locations::Column::AreaName.eq(area_name))
            .all(db)
            .await?
            .into_iter()
            .map(|location| location.id)
            .collect();
        let plant_ids: Vec<i32> = plant_locations::Entity::find()
            .filter(plant_locations::Column::LocationId.is_in(location_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.plant_id)
            .collect();
        query = query.filter(plants::Column::Id.is_in(plant_ids));
    }

    paginate_dtos(db, query, page, per_page).await
}

/// Case-insensitive substring search over published plant names.
pub async fn search(
    db: &DatabaseConnection,
    name_query: &str,
    page: u64,
    per_page: u64,
) -> Result<(Vec<PlantDto>, u64, u64), CoreError> {
    let pattern = format!("%{}%", name_query.to_lowercase());
    let query = plants::Entity::find()
        .filter(plants::Column::Status.eq(plants::Status::Published))
        .filter(Expr::cust_with_values("LOWER(name) LIKE $1", [pattern]));

    paginate_dtos(db, query, page, per_page).await
}

/// A creator's plants in any status, optionally narrowed to one status.
/// Visibility is the boundary's concern: the caller is asserted to be the
/// owner there.
pub async fn by_creator(
    db: &DatabaseConnection,
    creator_id: i32,
    status: Option<plants::Status>,
    page: u64,
    per_page: u64,
) -> Result<(Vec<PlantDto>, u64, u64), CoreError> {
    let mut query = plants::Entity::find().filter(plants::Column::CreatorId.eq(creator_id));
    if let Some(status) = status {
        query = query.filter(plants::Column::Status.eq(status));
    }

    paginate_dtos(db, query, page, per_page).await
}

/// Plants awaiting review, for the admin queue.
pub async fn pending(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<(Vec<PlantDto>, u64, u64), CoreError> {
    let query =
        plants::Entity::find().filter(plants::Column::Status.eq(plants::Status::PendingReview));

    paginate_dtos(db, query, page, per_page).await
}

/// One point per (published plant, location) pair.
pub async fn map_points(db: &DatabaseConnection) -> Result<Vec<MapPointDto>, CoreError> {
    let published = plants::Entity::find()
        .filter(plants::Column::Status.eq(plants::Status::Published))
        .all(db)
        .await?;

    let mut points = Vec::new();
    for plant in published {
        let links = plant_locations::Entity::find()
            .filter(plant_locations::Column::PlantId.eq(plant.id))
            .all(db)
            .await?;
        if links.is_empty() {
            continue;
        }

        let tags: Vec<TagDto> = plant
            .find_related(crate::orm::tags::Entity)
            .all(db)
            .await?
            .iter()
            .map(TagDto::from_model)
            .collect();

        for link in links {
            let location = crate::orm::locations::Entity::find_by_id(link.location_id)
                .one(db)
                .await?;
            let Some(location) = location else { continue };

            points.push(MapPointDto {
                plant_id: plant.id,
                name: plant.name.clone(),
                scientific_name: plant.scientific_name.clone(),
                tags: tags.clone(),
                main_image_url: plant.main_image_url.clone(),
                map_coord_x: location.map_coord_x,
                map_coord_y: location.map_coord_y,
            });
        }
    }

    Ok(points)
}

/// Assemble the full projection for one plant.
pub async fn to_dto(db: &DatabaseConnection, plant: &plants::Model) -> Result<PlantDto, CoreError> {
    let creator = users::Entity::find_by_id(plant.creator_id).one(db).await?;

    let tags: Vec<TagDto> = plant
        .find_related(crate::orm::tags::Entity)
        .all(db)
        .await?
        .iter()
        .map(TagDto::from_model)
        .collect();

    let links = plant_locations::Entity::find()
        .filter(plant_locations::Column::PlantId.eq(plant.id))
        .all(db)
        .await?;

    let mut locations = Vec::with_capacity(links.len());
    for link in links {
        let location = crate::orm::locations::Entity::find_by_id(link.location_id)
            .one(db)
            .await?;
        if let Some(location) = location {
            locations.push(LocationDto {
                id: location.id,
                area_name: location.area_name,
                specific_name: location.specific_name,
                map_coord_x: location.map_coord_x,
                map_coord_y: location.map_coord_y,
                notes: link.notes,
            });
        }
    }

    let images = crate::images::list_dtos(db, plant.id).await?;

    Ok(PlantDto {
        id: plant.id,
        name: plant.name.clone(),
        scientific_name: plant.scientific_name.clone(),
        family_genus: plant.family_genus.clone(),
        main_image_url: plant.main_image_url.clone(),
        flowering_period: plant.flowering_period.clone(),
        description: plant.description.clone(),
        status: plant.status.as_str().to_string(),
        review_notes: plant.review_notes.clone(),
        creator: creator.as_ref().map(UserDto::from_model),
        tags,
        locations,
        images,
        created_at: plant.created_at,
        updated_at: plant.updated_at,
    })
}

async fn paginate_dtos(
    db: &DatabaseConnection,
    query: Select<plants::Entity>,
    page: u64,
    per_page: u64,
) -> Result<(Vec<PlantDto>, u64, u64), CoreError> {
    let paginator = query
        .order_by_desc(plants::Column::CreatedAt)
        .paginate(db, per_page.max(1));

    let total_items = paginator.num_items().await?;
    let total_pages = paginator.num_pages().await?;
    let rows = paginator.fetch_page(page).await?;

    let mut dtos = Vec::with_capacity(rows.len());
    for plant in &rows {
        dtos.push(to_dto(db, plant).await?);
    }

    Ok((dtos, total_pages, total_items))
}

/// Resolve tag ids and insert the junction rows. Ids that don't resolve
/// are dropped, not an error.
async fn link_tags<C: ConnectionTrait>(
    db: &C,
    plant_id: i32,
    tag_ids: &[i32],
) -> Result<(), CoreError> {
    let resolved = crate::tags::find_by_ids(db, tag_ids).await?;

    for tag in resolved {
        plant_tags::ActiveModel {
            plant_id: Set(plant_id),
            tag_id: Set(tag.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

/// The create-or-reuse half of the location replacement protocol: resolve
/// each submitted pair against the registry and join the plant to it. A
/// pair submitted twice produces two junction rows pointing at the same
/// location; the engine does not dedupe.
async fn create_plant_locations<C: ConnectionTrait>(
    db: &C,
    plant_id: i32,
    locations: &[LocationInput],
) -> Result<(), CoreError> {
    if locations.is_empty() {
        return Ok(());
    }

    for info in locations {
        let location = crate::locations::find_or_create(
            db,
            &info.area_name,
            &info.specific_name,
            info.map_coord_x,
            info.map_coord_y,
        )
        .await?;

        plant_locations::ActiveModel {
            plant_id: Set(plant_id),
            location_id: Set(location.id),
            notes: Set(info.notes.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}
