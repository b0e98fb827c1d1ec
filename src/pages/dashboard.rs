use askama::Template;

use super::{Page, PageContext};
use crate::error::ShellError;

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
struct DashboardTemplate<'a> {
    email: &'a str,
    role: &'a str,
    user_id: String,
    theme: &'static str,
}

pub struct DashboardPage;

impl Page for DashboardPage {
    fn render(&self, ctx: &PageContext<'_>) -> Result<String, ShellError> {
        let template = DashboardTemplate {
            email: ctx.session.map(|s| s.email.as_str()).unwrap_or(""),
            role: ctx.session.map(|s| s.role.as_str()).unwrap_or(""),
            user_id: ctx
                .session
                .map(|s| s.user_id.to_string())
                .unwrap_or_default(),
            theme: ctx.theme.as_str(),
        };
        Ok(template.render()?)
    }
}
