//! Page units and the application's route configuration.

use std::collections::HashMap;

use crate::{
    auth::Session,
    config::AppConfig,
    error::ShellError,
    lazy::{Deferred, LazyPage},
    routes::table::{RouteDescriptor, RouteTableProvider},
    theme::Theme,
};

pub mod dashboard;
pub mod home;
pub mod login;
pub mod settings;

pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use settings::SettingsPage;

/// Everything a page may read while rendering.
pub struct PageContext<'a> {
    pub path: &'a str,
    pub query: &'a HashMap<String, String>,
    pub session: Option<&'a Session>,
    pub theme: Theme,
    pub config: &'a AppConfig,
}

/// Page
///
/// A renderable route unit. Produces the HTML fragment for the page body; the shell
/// decides what surrounds it.
pub trait Page: Send + Sync {
    fn render(&self, ctx: &PageContext<'_>) -> Result<String, ShellError>;
}

/// AppRoutes
///
/// The application's route configuration. Public pages are available immediately;
/// the secure pages are built the first time somebody navigates to them.
pub struct AppRoutes;

impl RouteTableProvider for AppRoutes {
    fn routes(&self) -> Vec<RouteDescriptor> {
        vec![
            RouteDescriptor::new("/home", "Home", LazyPage::ready("home", HomePage), false),
            RouteDescriptor::new("/login", "Sign in", LazyPage::ready("login", LoginPage), false),
            RouteDescriptor::new(
                "/dashboard",
                "Dashboard",
                LazyPage::new("dashboard", Deferred(|| DashboardPage)),
                true,
            ),
            RouteDescriptor::new(
                "/settings",
                "Settings",
                LazyPage::new("settings", Deferred(|| SettingsPage)),
                true,
            ),
        ]
    }
}
