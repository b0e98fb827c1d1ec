use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, Method},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Cross-cutting context: configuration, identity, theme and notifications.
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod theme;
pub mod toast;

// The page tree: route units, their chrome, the gate and the composition root.
pub mod gate;
pub mod layout;
pub mod lazy;
pub mod pages;
pub mod routes;
pub mod shell;

use routes::{api, public, table::RouteTable};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use directory::{InMemoryUserDirectory, PostgresUserDirectory, UserDirectoryState};
pub use error::ShellError;
pub use pages::AppRoutes;

/// ApiDoc
///
/// OpenAPI description of the shell's JSON and form endpoints, served at
/// `/api-docs/openapi.json`. Page routes are HTML and not listed.
#[derive(OpenApi)]
#[openapi(
    paths(
        public::health, public::create_session, public::logout, public::set_theme,
        public::toggle_sidebar,
        api::get_routes, api::get_me
    ),
    components(
        schemas(
            models::RouteManifestEntry, models::SessionProfile, models::SessionRequest,
            models::ThemeRequest, models::ReturnTo,
        )
    ),
    tags(
        (name = "app-shell", description = "Application shell endpoints")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable context handed to every handler: configuration, the auth
/// context's user directory and the validated route table. Built once at startup
/// and dropped when the server stops.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub users: UserDirectoryState,
    pub routes: Arc<RouteTable>,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for UserDirectoryState {
    fn from_ref(app_state: &AppState) -> UserDirectoryState {
        app_state.users.clone()
    }
}

/// create_router
///
/// Assembles the shell: the page tree built from the route table, the fixed public
/// and API endpoints, the default-route fallback, and the observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS: only the read-only JSON endpoints are meant for other origins.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Page tree: one entry per descriptor; secure entries carry the gate.
        .merge(shell::page_routes(&state))
        .merge(public::public_routes())
        .nest("/api", api::api_routes())
        // Unknown paths resolve to the default route.
        .fallback(shell::redirect_to_default)
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer`, correlating every log line of a request by its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
