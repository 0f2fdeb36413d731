use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{normalize_link, validate_text, validate_title};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSubmissionRequest {
    #[schema(example = "Smart Compost")]
    pub title: String,
    pub description: String,
    #[schema(example = "https://github.com/team/project")]
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    pub video_url: Option<String>,
}

/// Submission fields after validation, links normalized.
pub struct SubmissionFields {
    pub title: String,
    pub description: String,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    pub video_url: Option<String>,
}

pub fn validate_create_submission(
    req: CreateSubmissionRequest,
) -> Result<SubmissionFields, AppError> {
    validate_title(&req.title)?;
    validate_text(&req.description, "Description", false)?;
    Ok(SubmissionFields {
        title: req.title.trim().to_string(),
        description: req.description,
        repository_url: normalize_link(req.repository_url, "repository_url")?,
        demo_url: normalize_link(req.demo_url, "demo_url")?,
        video_url: normalize_link(req.video_url, "video_url")?,
    })
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    pub id: i32,
    pub team_id: i32,
    pub event_id: i32,
    pub title: String,
    pub description: String,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    pub video_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<crate::entity::submission::Model> for SubmissionResponse {
    fn from(m: crate::entity::submission::Model) -> Self {
        Self {
            id: m.id,
            team_id: m.team_id,
            event_id: m.event_id,
            title: m.title,
            description: m.description,
            repository_url: m.repository_url,
            demo_url: m.demo_url,
            video_url: m.video_url,
            submitted_at: m.submitted_at,
        }
    }
}

/// A team's submission, or an explicit `null` when it has none yet.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamSubmissionResponse {
    pub team_id: i32,
    pub submission: Option<SubmissionResponse>,
}
