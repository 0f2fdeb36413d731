use common::EventStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String, // in Markdown
    pub organizer_id: i32,
    pub status: EventStatus,

    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub submission_deadline: DateTimeUtc,
    pub max_team_size: i32,

    /// JSON array of track names.
    pub tracks: Json,
    /// JSON array of prize descriptions.
    pub prizes: Json,
    pub rules: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OrganizerId",
        to = "super::user::Column::Id"
    )]
    Organizer,
}

impl ActiveModelBehavior for ActiveModel {}
