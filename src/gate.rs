use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use url::form_urlencoded;

use crate::{
    AppState,
    auth::MaybeSession,
    toast::{self, Toast},
};

/// protected_route
///
/// Route layer applied to every secure descriptor. Authenticated requests continue
/// with their session stored in the request extensions; everything else is sent to
/// the login path with the original location in `next`.
pub async fn protected_route(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match session {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => {
            let original = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            let location = login_redirect(&state.config.login_path, original);
            tracing::info!(path = %request.uri().path(), "no session; redirecting to login");

            let jar = toast::queue(
                jar,
                &Toast::new("Sign in required")
                    .with_description("Please sign in to continue."),
            );
            (jar, Redirect::to(&location)).into_response()
        }
    }
}

/// `login_path?next=<original>`, with `original` form-encoded.
pub fn login_redirect(login_path: &str, original: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", original)
        .finish();
    format!("{login_path}?{query}")
}
