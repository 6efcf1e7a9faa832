//! SeaORM Entity for plant_locations junction table
//!
//! Junction with payload: a plant's presence at a location, with optional
//! free-text notes (population count etc.). Rows are replaced in bulk when
//! a plant's location list is resubmitted, never diffed.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "plant_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plant_id: i32,
    pub location_id: i32,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plants::Entity",
        from = "Column::PlantId",
        to = "super::plants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Plant,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Location,
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plant.def()
    }
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
