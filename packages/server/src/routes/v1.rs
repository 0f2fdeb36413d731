use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{auth, event, submission, team};
use crate::state::AppState;

pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
}

pub fn event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(event::list_events, event::create_event))
        .routes(routes!(event::list_organized_events))
        .routes(routes!(event::get_event))
        .routes(routes!(event::update_event_status))
}

pub fn team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(team::create_team))
        .routes(routes!(team::list_my_teams))
        .routes(routes!(team::join_team))
        .routes(routes!(
            submission::create_submission,
            submission::get_team_submission
        ))
}
