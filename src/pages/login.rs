use askama::Template;

use super::{Page, PageContext};
use crate::{error::ShellError, routes::public::local_target};

#[derive(Template)]
#[template(path = "pages/login.html")]
struct LoginTemplate<'a> {
    signed_in: bool,
    email: &'a str,
    next: String,
}

/// The unauthenticated entry point. Hands the pasted token to `POST /auth/session`
/// together with the page the gate sent the visitor away from.
pub struct LoginPage;

impl Page for LoginPage {
    fn render(&self, ctx: &PageContext<'_>) -> Result<String, ShellError> {
        let next = local_target(
            ctx.query.get("next").map(String::as_str),
            &ctx.config.default_path,
        );
        let template = LoginTemplate {
            signed_in: ctx.session.is_some(),
            email: ctx.session.map(|s| s.email.as_str()).unwrap_or(""),
            next,
        };
        Ok(template.render()?)
    }
}
