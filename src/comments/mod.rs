//! Comment tree manager.
//!
//! Comments are stored flat; the per-plant reply tree is assembled at read
//! time by grouping rows on their parent id. Deletion is a soft delete: the
//! content is replaced with a fixed tombstone and the author reference is
//! nulled, leaving the tree structure intact.

use crate::error::CoreError;
use crate::middleware::Principal;
use crate::orm::{comments, plants, users};
use crate::user::UserDto;
use chrono::Utc;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};
use serde::Serialize;
use std::collections::HashMap;

/// Tombstone text left in place of a soft-deleted comment's content.
pub const DELETED_CONTENT: &str = "This comment has been deleted by its author.";

#[derive(Debug, Serialize)]
pub struct CommentPlantInfo {
    pub id: i32,
    pub name: String,
    pub main_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentDto {
    pub id: i32,
    pub content: String,
    pub user: Option<UserDto>,
    pub created_at: chrono::NaiveDateTime,
    pub parent_id: Option<i32>,
    pub replies: Vec<CommentDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<CommentPlantInfo>,
}

/// Create a comment, optionally as a reply.
///
/// A supplied parent must exist and must belong to the same plant as the
/// new comment; a cross-plant parent is rejected.
pub async fn create(
    db: &DatabaseConnection,
    plant_id: i32,
    user_id: i32,
    content: &str,
    parent_comment_id: Option<i32>,
) -> Result<comments::Model, CoreError> {
    let plant = plants::Entity::find_by_id(plant_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Plant not found with id: {}", plant_id)))?;

    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("User not found with id: {}", user_id)))?;

    if let Some(parent_id) = parent_comment_id {
        let parent = comments::Entity::find_by_id(parent_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound(format!("Parent comment not found with id: {}", parent_id))
            })?;

        if parent.plant_id != plant.id {
            return Err(CoreError::InvalidArgument(
                "Parent comment does not belong to the same plant.".to_string(),
            ));
        }
    }

    let comment = comments::ActiveModel {
        plant_id: Set(plant.id),
        user_id: Set(Some(user.id)),
        parent_comment_id: Set(parent_comment_id),
        content: Set(content.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    Ok(comment.insert(db).await?)
}

/// Top-level comments for a plant, newest first, each carrying its full
/// reply subtree. Replies keep natural persistence order.
///
/// Returns (page items, total pages, total top-level comments).
pub async fn list(
    db: &DatabaseConnection,
    plant_id: i32,
    page: u64,
    per_page: u64,
) -> Result<(Vec<CommentDto>, u64, u64), CoreError> {
    let plant_exists = plants::Entity::find_by_id(plant_id).one(db).await?.is_some();
    if !plant_exists {
        return Err(CoreError::NotFound(format!(
            "Plant not found with id: {}",
            plant_id
        )));
    }

    let paginator = comments::Entity::find()
        .filter(comments::Column::PlantId.eq(plant_id))
        .filter(comments::Column::ParentCommentId.is_null())
        .order_by_desc(comments::Column::CreatedAt)
        .paginate(db, per_page.max(1));

    let total_items = paginator.num_items().await?;
    let total_pages = paginator.num_pages().await?;
    let top_level = paginator.fetch_page(page).await?;

    // One flat fetch per plant; the tree is grouped in memory.
    let all = comments::Entity::find()
        .filter(comments::Column::PlantId.eq(plant_id))
        .order_by_asc(comments::Column::Id)
        .all(db)
        .await?;

    let users = load_authors(db, &all).await?;

    let mut children: HashMap<i32, Vec<comments::Model>> = HashMap::new();
    for comment in &all {
        if let Some(parent_id) = comment.parent_comment_id {
            children.entry(parent_id).or_default().push(comment.clone());
        }
    }

    let dtos = top_level
        .iter()
        .map(|c| build_dto(c, &children, &users, None))
        .collect();

    Ok((dtos, total_pages, total_items))
}

/// A user's comments, newest first, with the owning plant's summary.
pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: i32,
    page: u64,
    per_page: u64,
) -> Result<(Vec<CommentDto>, u64, u64), CoreError> {
    let user_exists = users::Entity::find_by_id(user_id).one(db).await?.is_some();
    if !user_exists {
        return Err(CoreError::NotFound(format!(
            "User not found with id: {}",
            user_id
        )));
    }

    let paginator = comments::Entity::find()
        .filter(comments::Column::UserId.eq(user_id))
        .order_by_desc(comments::Column::CreatedAt)
        .paginate(db, per_page.max(1));

    let total_items = paginator.num_items().await?;
    let total_pages = paginator.num_pages().await?;
    let rows = paginator.fetch_page(page).await?;

    let users = load_authors(db, &rows).await?;
    let no_children: HashMap<i32, Vec<comments::Model>> = HashMap::new();

    let mut dtos = Vec::with_capacity(rows.len());
    for comment in &rows {
        let plant = plants::Entity::find_by_id(comment.plant_id).one(db).await?;
        let plant_info = plant.map(|p| CommentPlantInfo {
            id: p.id,
            name: p.name,
            main_image_url: p.main_image_url,
        });
        dtos.push(build_dto(comment, &no_children, &users, plant_info));
    }

    Ok((dtos, total_pages, total_items))
}

/// Soft-delete a comment.
///
/// The author may delete their own comment; an admin may delete any,
/// including one whose author is already redacted. The effect is
/// idempotent: re-applying leaves the same tombstone state.
pub async fn delete(
    db: &DatabaseConnection,
    comment_id: i32,
    requester: &Principal,
) -> Result<(), CoreError> {
    let comment = comments::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Comment not found with id: {}", comment_id)))?;

    if !requester.can_mutate(comment.user_id) {
        return Err(CoreError::Forbidden(
            "User is not authorized to delete this comment.".to_string(),
        ));
    }

    let mut active: comments::ActiveModel = comment.into();
    active.content = Set(DELETED_CONTENT.to_string());
    active.user_id = Set(None);
    active.update(db).await?;

    Ok(())
}

/// Project a single comment as a leaf node (no replies attached).
pub async fn to_dto(
    db: &DatabaseConnection,
    comment: &comments::Model,
) -> Result<CommentDto, CoreError> {
    let users = load_authors(db, std::slice::from_ref(comment)).await?;
    let no_children: HashMap<i32, Vec<comments::Model>> = HashMap::new();
    Ok(build_dto(comment, &no_children, &users, None))
}

async fn load_authors(
    db: &DatabaseConnection,
    rows: &[comments::Model],
) -> Result<HashMap<i32, users::Model>, CoreError> {
    let user_ids: Vec<i32> = rows.iter().filter_map(|c| c.user_id).collect();
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = users::Entity::find()
        .filter(users::Column::Id.is_in(user_ids))
        .all(db)
        .await?;

    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

fn build_dto(
    comment: &comments::Model,
    children: &HashMap<i32, Vec<comments::Model>>,
    users: &HashMap<i32, users::Model>,
    plant: Option<CommentPlantInfo>,
) -> CommentDto {
    let replies = children
        .get(&comment.id)
        .map(|kids| {
            kids.iter()
                .map(|kid| build_dto(kid, children, users, None))
                .collect()
        })
        .unwrap_or_default();

    CommentDto {
        id: comment.id,
        content: comment.content.clone(),
        user: comment
            .user_id
            .and_then(|id| users.get(&id))
            .map(UserDto::from_model),
        created_at: comment.created_at,
        parent_id: comment.parent_comment_id,
        replies,
        plant,
    }
}
