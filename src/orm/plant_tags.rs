//! SeaORM Entity for plant_tags junction table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "plant_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plant_id: i32,
    pub tag_id: i32,
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
        belongs_to = "super::tags::Entity",
        from = "Column::TagId",
        to = "super::tags::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plant.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
