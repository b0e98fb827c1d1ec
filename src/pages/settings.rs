use askama::Template;

use super::{Page, PageContext};
use crate::{error::ShellError, theme::Theme};

struct ThemeOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "pages/settings.html")]
struct SettingsTemplate<'a> {
    path: &'a str,
    email: &'a str,
    themes: Vec<ThemeOption>,
}

/// Theme switcher and sign-out.
pub struct SettingsPage;

impl Page for SettingsPage {
    fn render(&self, ctx: &PageContext<'_>) -> Result<String, ShellError> {
        let themes = Theme::ALL
            .into_iter()
            .map(|theme| ThemeOption {
                value: theme.as_str(),
                label: match theme {
                    Theme::Light => "Light",
                    Theme::Dark => "Dark",
                    Theme::System => "System",
                },
                selected: theme == ctx.theme,
            })
            .collect();

        let template = SettingsTemplate {
            path: ctx.path,
            email: ctx.session.map(|s| s.email.as_str()).unwrap_or(""),
            themes,
        };
        Ok(template.render()?)
    }
}
