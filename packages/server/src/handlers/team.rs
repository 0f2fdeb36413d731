use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{team, team_member};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::team::*;
use crate::policy;
use crate::state::AppState;
use crate::utils::event::find_event_accepting_teams;
use crate::utils::team::{insert_member, is_teamed, lock_team, member_ids, member_ids_by_team};

#[utoipa::path(
    post,
    path = "/",
    tag = "Teams",
    operation_id = "createTeam",
    summary = "Create a team for an event",
    description = "Creates a team led by the caller. The event must be `active` or `submissions_open`, and the caller must not already be on a team for it. Requires the `participant` role.",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error or event closed (VALIDATION_ERROR, EVENT_NOT_AVAILABLE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
        (status = 409, description = "Already on a team for this event (ALREADY_TEAMED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, event_id = payload.event_id))]
pub async fn create_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(policy::CREATE_TEAM)?;
    validate_create_team(&payload)?;

    let txn = state.db.begin().await?;
    find_event_accepting_teams(&txn, payload.event_id).await?;

    if is_teamed(&txn, payload.event_id, auth_user.user_id).await? {
        return Err(AppError::AlreadyTeamed);
    }

    let new_team = team::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        event_id: Set(payload.event_id),
        leader_id: Set(auth_user.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let team = new_team.insert(&txn).await?;
    insert_member(&txn, &team, auth_user.user_id, 0).await?;

    txn.commit().await?;
    tracing::info!(team_id = team.id, "Team created");

    let members = vec![auth_user.user_id];
    Ok((StatusCode::CREATED, Json(TeamResponse::new(team, members))))
}

#[utoipa::path(
    get,
    path = "/my",
    tag = "Teams",
    operation_id = "listMyTeams",
    summary = "List the caller's teams",
    description = "Returns every team the caller leads or belongs to, across events. Requires the `participant` role.",
    responses(
        (status = 200, description = "Caller's teams", body = Vec<TeamResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_my_teams(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    auth_user.require_role(policy::LIST_OWN_TEAMS)?;

    let team_ids: Vec<i32> = team_member::Entity::find()
        .filter(team_member::Column::UserId.eq(auth_user.user_id))
        .select_only()
        .column(team_member::Column::TeamId)
        .into_tuple()
        .all(&state.db)
        .await?;

    if team_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let teams = team::Entity::find()
        .filter(team::Column::Id.is_in(team_ids.clone()))
        .order_by_asc(team::Column::CreatedAt)
        .order_by_asc(team::Column::Id)
        .all(&state.db)
        .await?;
    let mut members = member_ids_by_team(&state.db, team_ids).await?;

    let data = teams
        .into_iter()
        .map(|team| {
            let ids = members.remove(&team.id).unwrap_or_default();
            TeamResponse::new(team, ids)
        })
        .collect();

    Ok(Json(data))
}

#[utoipa::path(
    post,
    path = "/{id}/join",
    tag = "Teams",
    operation_id = "joinTeam",
    summary = "Join an existing team",
    description = "Adds the caller to the team. The team's event must be `active` or `submissions_open`, the caller must not already be on a team for that event, and the team must be below the event's `max_team_size`. Requires the `participant` role.",
    params(("id" = i32, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Joined", body = TeamResponse),
        (status = 400, description = "Event closed or team full (EVENT_NOT_AVAILABLE, TEAM_FULL)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already on a team for this event (ALREADY_TEAMED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn join_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeamResponse>, AppError> {
    auth_user.require_role(policy::JOIN_TEAM)?;

    let txn = state.db.begin().await?;
    let team = lock_team(&txn, id).await?;
    let event = find_event_accepting_teams(&txn, team.event_id).await?;

    if is_teamed(&txn, team.event_id, auth_user.user_id).await? {
        return Err(AppError::AlreadyTeamed);
    }

    let mut members = member_ids(&txn, team.id).await?;
    if members.len() >= event.max_team_size as usize {
        return Err(AppError::TeamFull);
    }

    insert_member(&txn, &team, auth_user.user_id, members.len() as i32).await?;
    txn.commit().await?;
    tracing::info!(team_id = team.id, "Joined team");

    members.push(auth_user.user_id);
    Ok(Json(TeamResponse::new(team, members)))
}
