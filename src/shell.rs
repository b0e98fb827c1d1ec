//! The composition root of the page tree.
//!
//! Maps each route descriptor to one router entry, putting the gate and the
//! authenticated layout around secure entries, and resolves `/` and every unmatched
//! path to the default route.

use std::collections::HashMap;

use askama::Template;
use axum::{
    Router,
    extract::{RawQuery, State},
    http::header,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{MethodRouter, get},
};
use axum_extra::extract::CookieJar;
use url::form_urlencoded;

use crate::{
    AppState,
    auth::{MaybeSession, Session},
    error::ShellError,
    gate,
    lazy::Availability,
    layout::{AuthenticatedLayout, Document, LoadingFallback, SidebarState},
    pages::PageContext,
    routes::table::RouteDescriptor,
    theme::{Theme, ThemeChoice},
    toast,
};

/// page_routes
///
/// One GET entry per descriptor plus the root redirect. The descriptor's `is_secure`
/// flag is the only thing deciding between a bare page and a gated, laid-out one.
pub fn page_routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new().route("/", get(redirect_to_default));

    for route in state.routes.iter() {
        let entry = page_entry(route.clone());
        let entry = if route.is_secure {
            entry.route_layer(middleware::from_fn_with_state(
                state.clone(),
                gate::protected_route,
            ))
        } else {
            entry
        };
        router = router.route(&route.path, entry);
    }

    router
}

fn page_entry(route: RouteDescriptor) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>,
              MaybeSession(session): MaybeSession,
              ThemeChoice(theme): ThemeChoice,
              RawQuery(query): RawQuery,
              jar: CookieJar| async move {
            render_route(&route, &state, session.as_ref(), theme, query, jar)
        },
    )
}

/// redirect_to_default
///
/// Target of `/` and the router fallback. Unknown paths are never an error.
pub async fn redirect_to_default(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config.default_path)
}

fn render_route(
    route: &RouteDescriptor,
    state: &AppState,
    session: Option<&Session>,
    theme: Theme,
    query: Option<String>,
    jar: CookieJar,
) -> Result<Response, ShellError> {
    let page = match route.component.poll() {
        Availability::Ready(page) => page,
        Availability::Pending => {
            let (jar, pending_toast) = toast::take(jar);
            let fallback = LoadingFallback.render()?;
            let document = Document::new("Loading...", &state.config, theme, &fallback)
                .with_toast(pending_toast.as_ref())
                .refreshing()
                .render()?;
            return Ok((
                jar,
                [(header::CACHE_CONTROL, "no-store")],
                Html(document),
            )
                .into_response());
        }
        Availability::Failed(source) => {
            return Err(ShellError::PageLoad {
                page: route.component.name().to_string(),
                source,
            });
        }
    };

    let query: HashMap<String, String> = query
        .as_deref()
        .map(|raw| form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let ctx = PageContext {
        path: &route.path,
        query: &query,
        session,
        theme,
        config: &state.config,
    };
    let content = page.render(&ctx)?;

    let body = if route.is_secure {
        AuthenticatedLayout::new(
            &state.routes,
            route,
            session,
            &state.config,
            SidebarState::from_jar(&jar),
            &content,
        )
        .wrap()?
    } else {
        content
    };

    let (jar, pending_toast) = toast::take(jar);
    let document = Document::new(&route.title, &state.config, theme, &body)
        .with_toast(pending_toast.as_ref())
        .render()?;

    Ok((jar, Html(document)).into_response())
}
