use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{event, submission, team, team_member, user};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;
    ensure_indexes(&db).await?;

    Ok(db)
}

/// Create any missing tables from the entity definitions.
///
/// Tables are created parents first so foreign keys resolve.
pub async fn sync_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, event::Entity).await?;
    create_table(db, team::Entity).await?;
    create_table(db, team_member::Entity).await?;
    create_table(db, submission::Entity).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute_raw(backend.build(&stmt)).await?;
    Ok(())
}

/// Ensure secondary lookup indexes exist.
///
/// Uniqueness is carried by the table definitions themselves; these only
/// serve the lookups by event, organizer and team.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let indexes = [
        Index::create()
            .if_not_exists()
            .name("idx_event_status")
            .table(event::Entity)
            .col(event::Column::Status)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_event_organizer")
            .table(event::Entity)
            .col(event::Column::OrganizerId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_team_event")
            .table(team::Entity)
            .col(team::Column::EventId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_team_member_team")
            .table(team_member::Entity)
            .col(team_member::Column::TeamId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_submission_event")
            .table(submission::Entity)
            .col(submission::Column::EventId)
            .to_owned(),
    ];

    for stmt in &indexes {
        match db.execute_raw(backend.build(stmt)).await {
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to create index: {}", e);
            }
        }
    }
    info!("Ensured {} secondary indexes", indexes.len());

    Ok(())
}
