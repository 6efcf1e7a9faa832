//! Location registry: reusable place records, deduplicated by the exact
//! (area name, specific name) pair.

use crate::orm::locations;
use chrono::Utc;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter,
};

async fn find_by_pair<C: ConnectionTrait>(
    db: &C,
    area_name: &str,
    specific_name: &str,
) -> Result<Option<locations::Model>, DbErr> {
    locations::Entity::find()
        .filter(locations::Column::AreaName.eq(area_name))
        .filter(locations::Column::SpecificName.eq(specific_name))
        .one(db)
        .await
}

/// Resolve a location by its (area, specific name) pair, creating one with
/// the submitted coordinates when absent. An existing location's
/// coordinates are never updated: first writer wins.
///
/// A concurrent-insert unique violation is resolved by retrying the
/// lookup, mirroring the tag registry.
pub async fn find_or_create<C: ConnectionTrait>(
    db: &C,
    area_name: &str,
    specific_name: &str,
    map_coord_x: Option<f32>,
    map_coord_y: Option<f32>,
) -> Result<locations::Model, DbErr> {
    if let Some(existing) = find_by_pair(db, area_name, specific_name).await? {
        return Ok(existing);
    }

    let now = Utc::now().naive_utc();
    let insert = locations::ActiveModel {
        area_name: Set(area_name.to_string()),
        specific_name: Set(specific_name.to_string()),
        map_coord_x: Set(map_coord_x),
        map_coord_y: Set(map_coord_y),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match insert {
        Ok(location) => Ok(location),
        // Lost a creation race; the row exists now.
        Err(e) => match find_by_pair(db, area_name, specific_name).await? {
            Some(location) => Ok(location),
            None => Err(e),
        },
    }
}

/// Distinct area names, sorted, for the catalog's area filter.
pub async fn distinct_areas(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    locations::Entity::find()
        .select_only()
        .column(locations::Column::AreaName)
        .distinct()
        .order_by_asc(locations::Column::AreaName)
        .into_tuple::<String>()
        .all(db)
        .await
}
