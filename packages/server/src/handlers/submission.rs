use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::Role;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{submission, team, team_member};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::submission::*;
use crate::policy;
use crate::state::AppState;
use crate::utils::event::find_event;

/// Whether `user_id` is on the team, leader included.
async fn is_member<C: ConnectionTrait>(
    db: &C,
    team: &team::Model,
    user_id: i32,
) -> Result<bool, AppError> {
    Ok(team_member::Entity::find_by_id((team.event_id, user_id))
        .filter(team_member::Column::TeamId.eq(team.id))
        .one(db)
        .await?
        .is_some())
}

#[utoipa::path(
    post,
    path = "/{id}/submission",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit the team's project",
    description = "Records the team's single submission. The caller must be a member of the team and the event must be in `submissions_open`. Requires the `participant` role.",
    params(("id" = i32, Path, description = "Team ID")),
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 400, description = "Validation error or submissions closed (VALIDATION_ERROR, SUBMISSIONS_NOT_OPEN)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 403, description = "Forbidden or not on the team (FORBIDDEN, NOT_TEAM_MEMBER)", body = ErrorBody),
        (status = 409, description = "Team already submitted (SUBMISSION_ALREADY_EXISTS)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, id))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(policy::CREATE_SUBMISSION)?;
    let fields = validate_create_submission(payload)?;

    let txn = state.db.begin().await?;

    // Unknown teams are indistinguishable from teams the caller is not on.
    let team = team::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotTeamMember)?;
    if !is_member(&txn, &team, auth_user.user_id).await? {
        return Err(AppError::NotTeamMember);
    }

    let event = find_event(&txn, team.event_id).await?;
    if !event.status.accepts_submissions() {
        return Err(AppError::SubmissionsNotOpen);
    }

    let existing = submission::Entity::find()
        .filter(submission::Column::TeamId.eq(team.id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::SubmissionAlreadyExists);
    }

    let new_submission = submission::ActiveModel {
        team_id: Set(team.id),
        event_id: Set(team.event_id),
        title: Set(fields.title),
        description: Set(fields.description),
        repository_url: Set(fields.repository_url),
        demo_url: Set(fields.demo_url),
        video_url: Set(fields.video_url),
        submitted_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_submission
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Submission race: unique team_id caught on insert");
                AppError::SubmissionAlreadyExists
            }
            _ => AppError::from(e),
        })?;

    txn.commit().await?;
    tracing::info!(submission_id = model.id, team_id = team.id, "Submission created");

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}/submission",
    tag = "Submissions",
    operation_id = "getTeamSubmission",
    summary = "Get a team's submission",
    description = "Visible to members of the team, the organizer of the team's event, and judges. Anyone else, and any unknown team, gets 404. `submission` is null while the team has not submitted.",
    params(("id" = i32, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team submission", body = TeamSubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 404, description = "Team not found or not visible (NOT_FOUND_OR_UNAUTHORIZED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn get_team_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeamSubmissionResponse>, AppError> {
    auth_user.require_role(policy::READ_TEAM_SUBMISSION)?;

    let team = team::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFoundOrUnauthorized)?;

    // Judges see every team; organizers only teams in their own events.
    let visible = if auth_user.has_role(Role::Judge) {
        true
    } else if auth_user.has_role(Role::Organizer) {
        let event = find_event(&state.db, team.event_id).await?;
        event.organizer_id == auth_user.user_id
    } else {
        is_member(&state.db, &team, auth_user.user_id).await?
    };
    if !visible {
        return Err(AppError::NotFoundOrUnauthorized);
    }

    let submission = submission::Entity::find()
        .filter(submission::Column::TeamId.eq(team.id))
        .one(&state.db)
        .await?;

    Ok(Json(TeamSubmissionResponse {
        team_id: team.id,
        submission: submission.map(SubmissionResponse::from),
    }))
}
