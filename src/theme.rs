use std::{convert::Infallible, fmt, str::FromStr};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Theme
///
/// The colour scheme applied to the document root. `System` defers to the
/// browser's `prefers-color-scheme`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Class set on `<html>`; `None` lets the stylesheet follow the browser.
    pub fn root_class(self) -> Option<&'static str> {
        match self {
            Theme::System => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown theme '{0}'")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

/// ThemeChoice Extractor
///
/// Resolves the visitor's theme from the cookie named by `AppConfig::theme_storage_key`,
/// falling back to `AppConfig::default_theme` when the cookie is absent or unreadable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeChoice(pub Theme);

impl<S> FromRequestParts<S> for ThemeChoice
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(ThemeChoice(resolve(&jar, &config)))
    }
}

/// Theme stored in the jar, or the configured default.
pub fn resolve(jar: &CookieJar, config: &AppConfig) -> Theme {
    jar.get(&config.theme_storage_key)
        .and_then(|cookie| cookie.value().parse().ok())
        .unwrap_or(config.default_theme)
}

/// Persists `theme` under the configured storage key.
pub fn persist(jar: CookieJar, config: &AppConfig, theme: Theme) -> CookieJar {
    let cookie = Cookie::build((config.theme_storage_key.clone(), theme.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent();
    jar.add(cookie)
}
