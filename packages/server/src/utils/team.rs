use std::collections::HashMap;

use sea_orm::sea_query::LockType;
use sea_orm::*;

use crate::entity::{team, team_member};
use crate::error::AppError;

/// Look up a team and lock its row for the rest of the transaction.
///
/// Concurrent joins of the same team queue here, so the member count read
/// afterwards stays accurate until commit.
pub async fn lock_team<C: ConnectionTrait>(db: &C, id: i32) -> Result<team::Model, AppError> {
    team::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))
}

/// Member ids of a team, leader first then in join order.
pub async fn member_ids<C: ConnectionTrait>(db: &C, team_id: i32) -> Result<Vec<i32>, AppError> {
    let ids: Vec<i32> = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .order_by_asc(team_member::Column::Position)
        .select_only()
        .column(team_member::Column::UserId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids)
}

/// Member ids for several teams at once, keyed by team id.
pub async fn member_ids_by_team<C: ConnectionTrait>(
    db: &C,
    team_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<i32>>, AppError> {
    let rows = team_member::Entity::find()
        .filter(team_member::Column::TeamId.is_in(team_ids))
        .order_by_asc(team_member::Column::TeamId)
        .order_by_asc(team_member::Column::Position)
        .all(db)
        .await?;

    let mut members: HashMap<i32, Vec<i32>> = HashMap::new();
    for row in rows {
        members.entry(row.team_id).or_default().push(row.user_id);
    }
    Ok(members)
}

/// Whether the identity already leads or belongs to a team in the event.
pub async fn is_teamed<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    user_id: i32,
) -> Result<bool, AppError> {
    Ok(team_member::Entity::find_by_id((event_id, user_id))
        .one(db)
        .await?
        .is_some())
}

/// Insert a membership row, mapping a key collision to `AlreadyTeamed`.
pub async fn insert_member<C: ConnectionTrait>(
    db: &C,
    team: &team::Model,
    user_id: i32,
    position: i32,
) -> Result<team_member::Model, AppError> {
    let member = team_member::ActiveModel {
        event_id: Set(team.event_id),
        user_id: Set(user_id),
        team_id: Set(team.id),
        position: Set(position),
        joined_at: Set(chrono::Utc::now()),
    };

    member.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Team membership race: primary key caught on insert");
            AppError::AlreadyTeamed
        }
        _ => AppError::from(e),
    })
}
