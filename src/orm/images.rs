//! SeaORM Entity for images table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-image moderation status; uploads always start in `PendingReview`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[derive(Default)]
pub enum Status {
    #[sea_orm(string_value = "PENDING_REVIEW")]
    #[default]
    PendingReview,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::PendingReview => "PENDING_REVIEW",
            Status::Approved => "APPROVED",
            Status::Rejected => "REJECTED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plant_id: i32,
    pub uploader_id: i32,
    /// Opaque URL returned by the storage collaborator, stored verbatim
    pub image_url: String,
    pub caption: Option<String>,
    pub status: Status,
    pub created_at: DateTime,
    pub updated_at: DateTime,
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
        belongs_to = "super::users::Entity",
        from = "Column::UploaderId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Uploader,
}

impl Related<super::plants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plant.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
