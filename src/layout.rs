//! Presentational wrappers: the document every page response passes through, the
//! authenticated chrome around secure pages, and the loading fallback.

use askama::Template;
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

use crate::{
    auth::Session,
    config::AppConfig,
    error::ShellError,
    routes::table::{RouteDescriptor, RouteTable},
    theme::Theme,
    toast::Toast,
};

pub const SIDEBAR_COOKIE: &str = "sidebar_state";

/// Whether the sidebar is shown with labels or collapsed to its rail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SidebarState {
    #[default]
    Expanded,
    Collapsed,
}

impl SidebarState {
    pub fn from_jar(jar: &CookieJar) -> Self {
        match jar.get(SIDEBAR_COOKIE).map(|cookie| cookie.value()) {
            Some("collapsed") => SidebarState::Collapsed,
            _ => SidebarState::Expanded,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SidebarState::Expanded => "expanded",
            SidebarState::Collapsed => "collapsed",
        }
    }

    pub fn persist(self, jar: CookieJar) -> CookieJar {
        let cookie = Cookie::build((SIDEBAR_COOKIE, self.as_str()))
            .path("/")
            .same_site(SameSite::Lax)
            .permanent();
        jar.add(cookie)
    }
}

struct ToastView<'a> {
    title: &'a str,
    description: &'a str,
    variant: &'static str,
}

/// Document
///
/// The outermost HTML wrapper. Carries the theme on `<html>` and mounts the toaster
/// region, so both are present exactly once on every page.
#[derive(Template)]
#[template(path = "document.html")]
pub struct Document<'a> {
    title: &'a str,
    app_name: &'a str,
    theme: &'static str,
    theme_class: &'static str,
    refresh: bool,
    toasts: Vec<ToastView<'a>>,
    body: &'a str,
}

impl<'a> Document<'a> {
    pub fn new(title: &'a str, config: &'a AppConfig, theme: Theme, body: &'a str) -> Self {
        Self {
            title,
            app_name: &config.app_name,
            theme: theme.as_str(),
            theme_class: theme.root_class().unwrap_or(""),
            refresh: false,
            toasts: Vec::new(),
            body,
        }
    }

    pub fn with_toast(mut self, toast: Option<&'a Toast>) -> Self {
        self.toasts = toast
            .into_iter()
            .map(|toast| ToastView {
                title: &toast.title,
                description: toast.description.as_deref().unwrap_or(""),
                variant: toast.variant.as_str(),
            })
            .collect();
        self
    }

    /// Asks the browser to reload after a second. Used while a page unit loads.
    pub fn refreshing(mut self) -> Self {
        self.refresh = true;
        self
    }
}

struct NavItem<'a> {
    title: &'a str,
    path: &'a str,
    active: bool,
}

struct Crumb<'a> {
    label: &'a str,
    href: &'a str,
}

/// AuthenticatedLayout
///
/// Chrome shared by every secure page: sidebar with the secure routes, header with
/// the sidebar trigger, a separator and the breadcrumb trail, then the content inset.
#[derive(Template)]
#[template(path = "layout.html")]
pub struct AuthenticatedLayout<'a> {
    app_name: &'a str,
    default_path: &'a str,
    current_path: &'a str,
    collapsed: bool,
    nav: Vec<NavItem<'a>>,
    parents: Vec<Crumb<'a>>,
    page_title: &'a str,
    user_email: &'a str,
    content: &'a str,
}

impl<'a> AuthenticatedLayout<'a> {
    pub fn new(
        table: &'a RouteTable,
        route: &'a RouteDescriptor,
        session: Option<&'a Session>,
        config: &'a AppConfig,
        sidebar: SidebarState,
        content: &'a str,
    ) -> Self {
        let nav = table
            .secure_routes()
            .map(|r| NavItem {
                title: &r.title,
                path: &r.path,
                active: r.path == route.path,
            })
            .collect();

        Self {
            app_name: &config.app_name,
            default_path: &config.default_path,
            current_path: &route.path,
            collapsed: sidebar == SidebarState::Collapsed,
            nav,
            parents: vec![Crumb {
                label: &config.app_name,
                href: &config.default_path,
            }],
            page_title: &route.title,
            user_email: session.map(|s| s.email.as_str()).unwrap_or(""),
            content,
        }
    }

    pub fn wrap(self) -> Result<String, ShellError> {
        Ok(self.render()?)
    }
}

/// LoadingFallback
///
/// Placeholder shown instead of a page whose unit has not resolved yet.
#[derive(Template, Default)]
#[template(path = "loading.html")]
pub struct LoadingFallback;
