//! SeaORM Entity for tags table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Unique, case-sensitive label
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plant_tags::Entity")]
    PlantTags,
}

impl Related<super::plant_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlantTags.def()
    }
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        super::plant_tags::Relation::Plant.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plant_tags::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
