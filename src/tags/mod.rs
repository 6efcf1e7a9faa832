//! Tag registry: reusable labels attached to plants many-to-many.

use crate::orm::tags;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
}

impl TagDto {
    pub fn from_model(tag: &tags::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// All tags, for the public tag listing.
pub async fn all(db: &DatabaseConnection) -> Result<Vec<tags::Model>, DbErr> {
    tags::Entity::find()
        .order_by_asc(tags::Column::Name)
        .all(db)
        .await
}

/// Look up tags by id. Unknown ids are dropped, not an error.
pub async fn find_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<Vec<tags::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    tags::Entity::find()
        .filter(tags::Column::Id.is_in(ids.to_vec()))
        .all(db)
        .await
}

async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<tags::Model>, DbErr> {
    tags::Entity::find()
        .filter(tags::Column::Name.eq(name))
        .one(db)
        .await
}

/// Reuse an existing tag with an exact name match or create one.
///
/// Two concurrent callers submitting the same new name may both observe
/// "not found" and race on the insert; the loser's unique violation is
/// resolved by retrying the lookup.
pub async fn find_or_create<C: ConnectionTrait>(
    db: &C,
    names: &[String],
) -> Result<Vec<tags::Model>, DbErr> {
    let mut resolved: Vec<tags::Model> = Vec::with_capacity(names.len());

    for name in names {
        if resolved.iter().any(|t| &t.name == name) {
            continue;
        }

        if let Some(existing) = find_by_name(db, name).await? {
            resolved.push(existing);
            continue;
        }

        let insert = tags::ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        }
        .insert(db)
        .await;

        match insert {
            Ok(tag) => resolved.push(tag),
            // Lost a creation race; the row exists now.
            Err(e) => match find_by_name(db, name).await? {
                Some(tag) => resolved.push(tag),
                None => return Err(e),
            },
        }
    }

    Ok(resolved)
}
