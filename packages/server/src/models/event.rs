use chrono::{DateTime, Utc};
use common::EventStatus;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_text, validate_title};
use crate::error::AppError;

const MAX_LIST_ENTRIES: usize = 50;

fn default_max_team_size() -> i32 {
    4
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Spring Hack 2026")]
    pub title: String,
    /// Markdown description.
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Must fall between `start_date` and `end_date`.
    pub submission_deadline: DateTime<Utc>,
    /// Defaults to 4.
    #[serde(default = "default_max_team_size")]
    #[schema(example = 4)]
    pub max_team_size: i32,
    #[serde(default)]
    pub tracks: Vec<String>,
    #[serde(default)]
    pub prizes: Vec<String>,
    #[serde(default)]
    pub rules: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateEventStatusRequest {
    pub status: EventStatus,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    /// 1-based page number.
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Only events in this status. `draft` always yields nothing.
    pub status: Option<EventStatus>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub organizer_id: i32,
    pub status: EventStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub submission_deadline: DateTime<Utc>,
    pub max_team_size: i32,
    pub tracks: Vec<String>,
    pub prizes: Vec<String>,
    pub rules: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventListResponse {
    pub data: Vec<EventResponse>,
    pub pagination: Pagination,
}

impl From<crate::entity::event::Model> for EventResponse {
    fn from(m: crate::entity::event::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            organizer_id: m.organizer_id,
            status: m.status,
            start_date: m.start_date,
            end_date: m.end_date,
            submission_deadline: m.submission_deadline,
            max_team_size: m.max_team_size,
            tracks: serde_json::from_value(m.tracks).unwrap_or_default(),
            prizes: serde_json::from_value(m.prizes).unwrap_or_default(),
            rules: m.rules,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_entries(entries: &[String], name: &str) -> Result<(), AppError> {
    if entries.len() > MAX_LIST_ENTRIES {
        return Err(AppError::Validation(format!(
            "Too many {name}: max {MAX_LIST_ENTRIES}"
        )));
    }
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() || entry.chars().count() > 256 {
            return Err(AppError::Validation(format!(
                "Each entry in {name} must be 1-256 characters"
            )));
        }
    }
    Ok(())
}

pub fn validate_create_event(req: &CreateEventRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_text(&req.description, "Description", true)?;
    validate_text(&req.rules, "Rules", false)?;
    if req.end_date <= req.start_date {
        return Err(AppError::Validation(
            "end_date must be after start_date".into(),
        ));
    }
    if req.submission_deadline < req.start_date || req.submission_deadline > req.end_date {
        return Err(AppError::Validation(
            "submission_deadline must be between start_date and end_date".into(),
        ));
    }
    if !(1..=1000).contains(&req.max_team_size) {
        return Err(AppError::Validation(
            "max_team_size must be between 1 and 1000".into(),
        ));
    }
    validate_entries(&req.tracks, "tracks")?;
    validate_entries(&req.prizes, "prizes")?;
    Ok(())
}
