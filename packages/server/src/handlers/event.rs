use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::EventStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::event;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::event::*;
use crate::models::shared::Pagination;
use crate::policy;
use crate::state::AppState;
use crate::utils::event::{check_event_visible, find_event, find_owned_event, swap_event_status};

fn trimmed(entries: Vec<String>) -> serde_json::Value {
    entries
        .into_iter()
        .map(|e| serde_json::Value::String(e.trim().to_string()))
        .collect()
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Events",
    operation_id = "createEvent",
    summary = "Create a new event",
    description = "Creates an event in `draft` status owned by the caller. Requires the `organizer` role.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, title = %payload.title))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(policy::CREATE_EVENT)?;
    validate_create_event(&payload)?;

    let now = chrono::Utc::now();
    let new_event = event::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        organizer_id: Set(auth_user.user_id),
        status: Set(EventStatus::Draft),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        submission_deadline: Set(payload.submission_deadline),
        max_team_size: Set(payload.max_team_size),
        tracks: Set(trimmed(payload.tracks)),
        prizes: Set(trimmed(payload.prizes)),
        rules: Set(payload.rules),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_event.insert(&state.db).await?;
    tracing::info!(event_id = model.id, "Event created");

    Ok((StatusCode::CREATED, Json(EventResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Events",
    operation_id = "listEvents",
    summary = "List public events",
    description = "Returns every event that is not in `draft` status, ordered by start date. No authentication required.",
    params(EventListQuery),
    responses(
        (status = 200, description = "List of events", body = EventListResponse),
        (status = 400, description = "Malformed query or page out of range (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_events(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<EventListQuery>,
) -> Result<Json<EventListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    // Offsets are bound as signed 64-bit integers.
    let offset = (page - 1)
        .checked_mul(per_page)
        .filter(|&offset| i64::try_from(offset).is_ok())
        .ok_or_else(|| AppError::Validation("page is out of range".into()))?;

    let mut select = event::Entity::find().filter(event::Column::Status.ne(EventStatus::Draft));
    if let Some(status) = query.status {
        select = select.filter(event::Column::Status.eq(status));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_asc(event::Column::StartDate)
        .order_by_asc(event::Column::Id)
        .offset(Some(offset))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(EventListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/organized",
    tag = "Events",
    operation_id = "listOrganizedEvents",
    summary = "List the caller's own events",
    description = "Returns all events organized by the caller, drafts included, newest first. Requires the `organizer` role.",
    responses(
        (status = 200, description = "Organizer's events", body = Vec<EventResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_organized_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    auth_user.require_role(policy::LIST_ORGANIZED_EVENTS)?;

    let events = event::Entity::find()
        .filter(event::Column::OrganizerId.eq(auth_user.user_id))
        .order_by_desc(event::Column::CreatedAt)
        .order_by_desc(event::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    operation_id = "getEvent",
    summary = "Get an event by ID",
    description = "Returns the event. Draft events are only visible to their organizer; everyone else gets 404. Authentication is optional.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 401, description = "Bad token supplied (TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_event(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventResponse>, AppError> {
    let model = find_event(&state.db, id).await?;
    check_event_visible(auth_user.as_ref(), &model)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}/status",
    tag = "Events",
    operation_id = "updateEventStatus",
    summary = "Move an event to a later lifecycle status",
    description = "Only the organizer who owns the event may change its status, and only forward along draft → active → submissions_open → submissions_closed → judging → completed (skipping is allowed). Missing events and events owned by someone else both return 404.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = EventResponse),
        (status = 400, description = "Backward or repeated transition (INVALID_TRANSITION)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED)", body = ErrorBody),
        (status = 403, description = "Forbidden (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Event not found or not owned (NOT_FOUND_OR_UNAUTHORIZED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, id, status = %payload.status))]
pub async fn update_event_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventStatusRequest>,
) -> Result<Json<EventResponse>, AppError> {
    auth_user.require_role(policy::UPDATE_EVENT_STATUS)?;

    let existing = find_owned_event(&state.db, &auth_user, id).await?;
    let next = existing.status.transition_to(payload.status).map_err(|e| {
        tracing::warn!("Rejected transition: {e}");
        AppError::from(e)
    })?;

    if !swap_event_status(&state.db, id, existing.status, next).await? {
        tracing::warn!("Event status changed concurrently");
        return Err(AppError::InvalidTransition(
            "Event status changed concurrently, reload and retry".into(),
        ));
    }

    tracing::info!(from = %existing.status, to = %next, "Event status updated");

    let model = find_event(&state.db, id).await?;
    Ok(Json(model.into()))
}
