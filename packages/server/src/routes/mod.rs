mod v1;

use utoipa_axum::router::OpenApiRouter;

use crate::state::AppState;

/// Every API version, mounted under `/api` by the caller.
pub fn api_routes() -> OpenApiRouter<AppState> {
    let v1 = OpenApiRouter::new()
        .nest("/auth", v1::auth_routes())
        .nest("/events", v1::event_routes())
        .nest("/teams", v1::team_routes());

    OpenApiRouter::new().nest("/v1", v1)
}
