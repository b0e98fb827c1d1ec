use axum::{Json, Router, extract::State, routing::get};

use crate::{
    AppState,
    auth::Session,
    models::{RouteManifestEntry, SessionProfile},
};

/// API Router Module
///
/// JSON views of the shell for client-side navigation: the route manifest and the
/// caller's session. Unlike the page routes these answer 401 instead of redirecting.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/routes
        .route("/routes", get(get_routes))
        // GET /api/me
        .route("/me", get(get_me))
}

/// get_routes
///
/// [Public Route] Lists the configured routes in table order.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route manifest", body = [RouteManifestEntry]))
)]
pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteManifestEntry>> {
    Json(state.routes.manifest())
}

/// get_me
///
/// [Authenticated Route] The resolved identity of the caller.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current session", body = SessionProfile),
        (status = 401, description = "No valid session")
    )
)]
pub async fn get_me(session: Session) -> Json<SessionProfile> {
    Json(session.into())
}
