use std::env;

use crate::theme::Theme;

/// Local fallback for the JWT secret. Never accepted in production.
const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the shell's entire configuration state. Immutable once loaded and shared
/// with every handler, extractor and middleware through `FromRef<AppState>`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local `x-user-id` bypass and log format.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Secret key used to decode and validate session JWTs.
    pub jwt_secret: String,
    // Optional Postgres connection string for the user directory.
    pub db_url: Option<String>,
    // Display name used in the sidebar header and the first breadcrumb.
    pub app_name: String,
    // Target of the root redirect and of every unmatched path.
    pub default_path: String,
    // Unauthenticated entry point the gate redirects to.
    pub login_path: String,
    // Theme applied when the visitor has not chosen one.
    pub default_theme: Theme,
    // Cookie name the chosen theme is persisted under.
    pub theme_storage_key: String,
    // Cookie name holding the session token.
    pub session_cookie: String,
    // Resolve every lazy page at startup instead of on first navigation.
    pub preload_pages: bool,
}

/// Env
///
/// Runtime context, switching between development conveniences and hardened production behaviour.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking configuration used for test state scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "0.0.0.0:3000".to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            db_url: None,
            app_name: "App Shell".to_string(),
            default_path: "/home".to_string(),
            login_path: "/login".to_string(),
            default_theme: Theme::Light,
            theme_storage_key: "ui-theme".to_string(),
            session_cookie: "session".to_string(),
            preload_pages: false,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, falling back to the
    /// defaults above for everything optional.
    ///
    /// # Panics
    /// Panics when `JWT_SECRET` is missing in `Env::Production`, or when `THEME_DEFAULT`
    /// names an unknown theme. The server must not start half-configured.
    pub fn load() -> Self {
        let defaults = Self::default();

        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            Env::Local => env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
        };

        let default_theme = match env::var("THEME_DEFAULT") {
            Ok(raw) => raw
                .parse::<Theme>()
                .unwrap_or_else(|_| panic!("FATAL: THEME_DEFAULT has unknown theme '{raw}'")),
            Err(_) => defaults.default_theme,
        };

        Self {
            env,
            bind_addr: env::var("APP_BIND_ADDR").unwrap_or(defaults.bind_addr),
            jwt_secret,
            db_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            default_path: env::var("APP_DEFAULT_PATH").unwrap_or(defaults.default_path),
            login_path: env::var("APP_LOGIN_PATH").unwrap_or(defaults.login_path),
            default_theme,
            theme_storage_key: env::var("THEME_STORAGE_KEY").unwrap_or(defaults.theme_storage_key),
            session_cookie: env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            preload_pages: env::var("APP_PRELOAD_PAGES")
                .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.preload_pages),
        }
    }
}
