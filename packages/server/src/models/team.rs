use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTeamRequest {
    #[schema(example = "Null Pointers")]
    pub name: String,
    pub event_id: i32,
}

pub fn validate_create_team(req: &CreateTeamRequest) -> Result<(), AppError> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation(
            "Team name must be 1-64 characters".into(),
        ));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamResponse {
    pub id: i32,
    pub name: String,
    pub event_id: i32,
    pub leader_id: i32,
    /// Member identity ids in join order, leader first.
    pub members: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl TeamResponse {
    pub fn new(team: crate::entity::team::Model, members: Vec<i32>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            event_id: team.event_id,
            leader_id: team.leader_id,
            members,
            created_at: team.created_at,
        }
    }
}
