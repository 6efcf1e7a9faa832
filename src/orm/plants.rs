//! SeaORM Entity for plants table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication status of a plant record.
///
/// New records default to `Draft`. Only `PendingReview` records can be
/// reviewed; `ReviewNotes` on the model is meaningful for `Rejected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[derive(Default)]
pub enum Status {
    #[sea_orm(string_value = "DRAFT")]
    #[default]
    Draft,
    #[sea_orm(string_value = "PENDING_REVIEW")]
    PendingReview,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

impl Status {
    /// Parse a caller-supplied status literal. Case-sensitive, exact
    /// spelling; anything else is a parse failure.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(Status::Draft),
            "PENDING_REVIEW" => Some(Status::PendingReview),
            "PUBLISHED" => Some(Status::Published),
            "REJECTED" => Some(Status::Rejected),
            "ARCHIVED" => Some(Status::Archived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "DRAFT",
            Status::PendingReview => "PENDING_REVIEW",
            Status::Published => "PUBLISHED",
            Status::Rejected => "REJECTED",
            Status::Archived => "ARCHIVED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "plants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub scientific_name: Option<String>,
    pub family_genus: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub flowering_period: Option<String>,
    pub main_image_url: Option<String>,
    pub status: Status,
    /// Set by review; meaningful when the decision was a rejection
    #[sea_orm(column_type = "Text", nullable)]
    pub review_notes: Option<String>,
    /// Immutable after creation
    pub creator_id: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Creator,
    #[sea_orm(has_many = "super::plant_tags::Entity")]
    PlantTags,
    #[sea_orm(has_many = "super::plant_locations::Entity")]
    PlantLocations,
    #[sea_orm(has_many = "super::images::Entity")]
    Images,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::plant_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlantTags.def()
    }
}

impl Related<super::plant_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlantLocations.def()
    }
}

impl Related<super::images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::plant_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plant_tags::Relation::Plant.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
