use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::lazy::PageLoadError;

/// ShellError
///
/// Request-time failures of the shell. This is the error boundary above the route
/// tree: anything a page or its loader raises ends up here and is shown as a 500
/// error page. Unknown paths and missing sessions are redirects, never errors.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("page '{page}' failed to load: {source}")]
    PageLoad {
        page: String,
        #[source]
        source: PageLoadError,
    },
    #[error("failed to render template: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    status: u16,
    heading: &'a str,
}

impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let heading = match &self {
            ShellError::PageLoad { .. } => "This page could not be loaded.",
            ShellError::Render(_) => "Something went wrong while rendering this page.",
        };

        let template = ErrorTemplate {
            status: status.as_u16(),
            heading,
        };
        match template.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, heading.to_string()).into_response(),
        }
    }
}
