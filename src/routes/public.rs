use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

use crate::{
    AppState,
    auth::validate_token,
    config::Env,
    gate::login_redirect,
    layout::SidebarState,
    models::{ReturnTo, SessionRequest, ThemeRequest},
    theme::{self, Theme},
    toast::{self, Toast},
};

/// Public Router Module
///
/// Endpoints reachable without a session: health, the session hand-off from the
/// login page, sign-out, and the small preference actions (theme, sidebar) that
/// redirect straight back to the page they were posted from.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        .route("/health", get(health))
        // POST /auth/session
        // Validates a provider-issued token and stores it in the session cookie.
        .route("/auth/session", post(create_session))
        // POST /auth/logout
        .route("/auth/logout", post(logout))
        // POST /theme
        // Persists the chosen theme under the configured storage key.
        .route("/theme", post(set_theme))
        // POST /sidebar/toggle
        .route("/sidebar/toggle", post(toggle_sidebar))
}

/// local_target
///
/// Returns `next` when it is a path on this site, `fallback` otherwise. Blocks
/// protocol-relative (`//host`) and backslash tricks that browsers treat as off-site.
pub fn local_target(next: Option<&str>, fallback: &str) -> String {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// create_session
///
/// [Public Route] Accepts the login form. A valid token becomes the session cookie and
/// the visitor continues to `next`; an invalid one sends them back to the login page.
#[utoipa::path(
    post,
    path = "/auth/session",
    request_body(content = SessionRequest, content_type = "application/x-www-form-urlencoded"),
    responses((
        status = 303,
        description = "Redirect to `next` when the token is accepted, back to the login path otherwise"
    ))
)]
pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(request): Form<SessionRequest>,
) -> impl IntoResponse {
    let config = &state.config;
    let target = local_target(request.next.as_deref(), &config.default_path);
    let token = request.access_token.trim();

    match validate_token(token, config, &state.users).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user_id, "session established");
            let cookie = Cookie::build((config.session_cookie.clone(), token.to_string()))
                .path("/")
                .http_only(true)
                .secure(config.env == Env::Production)
                .same_site(SameSite::Lax);
            let jar = toast::queue(jar.add(cookie), &Toast::new("Signed in"));
            (jar, Redirect::to(&target))
        }
        Err(e) => {
            tracing::info!(reason = %e, "sign-in rejected");
            let jar = toast::queue(
                jar,
                &Toast::destructive("Sign in failed").with_description(e.to_string()),
            );
            (jar, Redirect::to(&login_redirect(&config.login_path, &target)))
        }
    }
}

/// logout
///
/// Clears the session cookie and returns to the login page.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 303, description = "Signed out; redirect to the login path"))
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(state.config.session_cookie.clone()).path("/"));
    let jar = toast::queue(jar, &Toast::new("Signed out"));
    (jar, Redirect::to(&state.config.login_path))
}

/// set_theme
#[utoipa::path(
    post,
    path = "/theme",
    request_body(content = ThemeRequest, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Theme stored; redirect back"))
)]
pub async fn set_theme(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(request): Form<ThemeRequest>,
) -> impl IntoResponse {
    let target = local_target(request.next.as_deref(), &state.config.default_path);

    let jar = match request.theme.parse::<Theme>() {
        Ok(choice) => theme::persist(jar, &state.config, choice),
        Err(e) => toast::queue(
            jar,
            &Toast::destructive("Theme not changed").with_description(e.to_string()),
        ),
    };
    (jar, Redirect::to(&target))
}

/// toggle_sidebar
#[utoipa::path(
    post,
    path = "/sidebar/toggle",
    request_body(content = ReturnTo, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Sidebar state flipped; redirect back"))
)]
pub async fn toggle_sidebar(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(request): Form<ReturnTo>,
) -> impl IntoResponse {
    let target = local_target(request.next.as_deref(), &state.config.default_path);
    let next_state = SidebarState::from_jar(&jar).toggled();
    (next_state.persist(jar), Redirect::to(&target))
}
