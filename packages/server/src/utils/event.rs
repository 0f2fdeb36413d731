use common::EventStatus;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entity::event;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;

/// Look up an event by ID, returning 404 if not found.
pub async fn find_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

/// Look up an event owned by the caller.
///
/// A missing event and someone else's event both yield
/// `NotFoundOrUnauthorized`.
pub async fn find_owned_event<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .filter(event::Column::OrganizerId.eq(auth_user.user_id))
        .one(db)
        .await?
        .ok_or(AppError::NotFoundOrUnauthorized)
}

/// Drafts are visible only to their organizer; to anyone else they do not exist.
pub fn check_event_visible(
    auth_user: Option<&AuthUser>,
    event: &event::Model,
) -> Result<(), AppError> {
    if event.status.is_publicly_visible() {
        return Ok(());
    }
    if auth_user.is_some_and(|u| u.user_id == event.organizer_id) {
        return Ok(());
    }
    Err(AppError::NotFound("Event not found".into()))
}

/// Look up the event a team is being formed in, requiring a team-accepting status.
///
/// Unknown events are reported the same way as closed ones.
pub async fn find_event_accepting_teams<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<event::Model, AppError> {
    let event = event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::EventNotAvailable)?;
    if !event.status.accepts_teams() {
        return Err(AppError::EventNotAvailable);
    }
    Ok(event)
}

/// Compare-and-set the status of an event.
///
/// Returns `false` when the stored status no longer equals `expected`,
/// meaning a concurrent transition got there first.
pub async fn swap_event_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    expected: EventStatus,
    next: EventStatus,
) -> Result<bool, AppError> {
    let result = event::Entity::update_many()
        .set(event::ActiveModel {
            status: Set(next),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        })
        .filter(event::Column::Id.eq(id))
        .filter(event::Column::Status.eq(expected))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}
