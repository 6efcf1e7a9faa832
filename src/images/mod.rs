//! Image lifecycle: per-image moderation status, ownership, and deletion
//! authorization. Raw byte persistence is delegated to the storage
//! backend; the database record only carries the returned URL.

use crate::error::CoreError;
use crate::middleware::Principal;
use crate::orm::{images, plants, users};
use crate::storage::{get_file_store, unique_filename};
use crate::user::UserDto;
use chrono::Utc;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter,
};
use serde::Serialize;

/// An upload received from the boundary: original filename plus bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct ImageDto {
    pub id: i32,
    pub image_url: String,
    pub caption: Option<String>,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
    pub uploader: Option<UserDto>,
}

impl ImageDto {
    pub fn from_model(image: &images::Model, uploader: Option<&users::Model>) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url.clone(),
            caption: image.caption.clone(),
            status: image.status.as_str().to_string(),
            created_at: image.created_at,
            uploader: uploader.map(UserDto::from_model),
        }
    }
}

/// Store raw bytes under `subdirectory` and return the URL. No database
/// record is created; used for plant main images and avatars.
pub async fn store_and_get_url(upload: Upload, subdirectory: &str) -> Result<String, CoreError> {
    let filename = unique_filename(&upload.filename).map_err(|e| match e {
        crate::storage::StorageError::InvalidName(name) => {
            CoreError::InvalidArgument(format!("Invalid file name: {}", name))
        }
        other => CoreError::Storage(other),
    })?;
    let url = get_file_store()
        .store(upload.data, subdirectory, &filename)
        .await?;
    Ok(url)
}

async fn insert_record(
    db: &DatabaseConnection,
    plant_id: i32,
    uploader_id: i32,
    image_url: String,
) -> Result<images::Model, CoreError> {
    let now = Utc::now().naive_utc();
    let image = images::ActiveModel {
        plant_id: Set(plant_id),
        uploader_id: Set(uploader_id),
        image_url: Set(image_url),
        status: Set(images::Status::PendingReview),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(image.insert(db).await?)
}

/// Attach an image to a plant. The plant must exist; any status is
/// acceptable on this path. The new record starts in PENDING_REVIEW.
pub async fn attach(
    db: &DatabaseConnection,
    plant_id: i32,
    uploader_id: i32,
    upload: Upload,
) -> Result<images::Model, CoreError> {
    let plant = plants::Entity::find_by_id(plant_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Plant not found with id: {}", plant_id)))?;

    let url = store_and_get_url(upload, "plants").await?;
    insert_record(db, plant.id, uploader_id, url).await
}

/// Attach an additional image to an already published plant. The plant
/// must exist AND be PUBLISHED; anything else reads as not found.
pub async fn attach_to_published(
    db: &DatabaseConnection,
    plant_id: i32,
    uploader_id: i32,
    upload: Upload,
) -> Result<images::Model, CoreError> {
    let plant = plants::Entity::find_by_id(plant_id)
        .filter(plants::Column::Status.eq(plants::Status::Published))
        .one(db)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound(format!("Published plant not found with id: {}", plant_id))
        })?;

    let url = store_and_get_url(upload, "plants").await?;
    insert_record(db, plant.id, uploader_id, url).await
}

/// All images for a plant, regardless of moderation status. Filtering by
/// status, if desired, is a presentation concern.
pub async fn list(db: &DatabaseConnection, plant_id: i32) -> Result<Vec<images::Model>, CoreError> {
    Ok(images::Entity::find()
        .filter(images::Column::PlantId.eq(plant_id))
        .order_by_asc(images::Column::Id)
        .all(db)
        .await?)
}

/// Delete an image. Only the uploader or an admin may do this.
///
/// The raw file is removed best-effort: a storage failure is logged and
/// does not block the record deletion.
pub async fn delete(
    db: &DatabaseConnection,
    image_id: i32,
    requester: &Principal,
) -> Result<(), CoreError> {
    let image = images::Entity::find_by_id(image_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Image not found with id: {}", image_id)))?;

    if !requester.can_mutate(Some(image.uploader_id)) {
        return Err(CoreError::Forbidden(
            "User is not authorized to delete this image.".to_string(),
        ));
    }

    if let Err(e) = get_file_store().delete(&image.image_url).await {
        log::warn!("Could not delete file for image {}: {}", image.id, e);
    }

    images::Entity::delete_by_id(image.id).exec(db).await?;
    Ok(())
}

/// Images joined with their uploaders for the public listing.
pub async fn list_dtos(db: &DatabaseConnection, plant_id: i32) -> Result<Vec<ImageDto>, CoreError> {
    let rows = images::Entity::find()
        .filter(images::Column::PlantId.eq(plant_id))
        .find_also_related(users::Entity)
        .order_by_asc(images::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .iter()
        .map(|(image, uploader)| ImageDto::from_model(image, uploader.as_ref()))
        .collect())
}
