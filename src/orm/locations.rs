//! SeaORM Entity for locations table
//!
//! Two locations with the same (area_name, specific_name) pair never
//! coexist; resolution goes through `crate::locations::find_or_create`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Broad area, e.g. a campus district
    pub area_name: String,
    /// Specific place inside the area, e.g. "in front of the library"
    pub specific_name: String,
    pub map_coord_x: Option<f32>,
    pub map_coord_y: Option<f32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plant_locations::Entity")]
    PlantLocations,
}

impl Related<super::plant_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlantLocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
