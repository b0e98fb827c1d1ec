use askama::Template;

use super::{Page, PageContext};
use crate::error::ShellError;

#[derive(Template)]
#[template(path = "pages/home.html")]
struct HomeTemplate<'a> {
    app_name: &'a str,
    login_path: &'a str,
    signed_in: bool,
    email: &'a str,
}

/// Public landing page and the target of every unmatched path.
pub struct HomePage;

impl Page for HomePage {
    fn render(&self, ctx: &PageContext<'_>) -> Result<String, ShellError> {
        let template = HomeTemplate {
            app_name: &ctx.config.app_name,
            login_path: &ctx.config.login_path,
            signed_in: ctx.session.is_some(),
            email: ctx.session.map(|s| s.email.as_str()).unwrap_or(""),
        };
        Ok(template.render()?)
    }
}
