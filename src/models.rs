use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// User
///
/// A directory record, as stored in the `public.profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // 'member' or 'admin'. Only displayed by the shell.
    pub role: String,
}

/// SessionRequest
///
/// Form posted by the login page (POST /auth/session). The access token is minted by
/// the identity provider; the shell only validates it and stores it in the session cookie.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SessionRequest {
    pub access_token: String,
    /// Local path to return to after signing in.
    #[serde(default)]
    pub next: Option<String>,
}

/// ReturnTo
///
/// Form carried by the shell's small POST actions (logout, sidebar toggle) that
/// redirect back to where the visitor came from.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnTo {
    #[serde(default)]
    pub next: Option<String>,
}

/// ThemeRequest
///
/// Form posted by the theme switcher (POST /theme).
#[derive(Debug, Deserialize, ToSchema)]
pub struct ThemeRequest {
    /// One of `light`, `dark` or `system`.
    pub theme: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// RouteManifestEntry
///
/// Public projection of a route descriptor (GET /api/routes).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RouteManifestEntry {
    pub path: String,
    pub title: String,
    pub is_secure: bool,
}

/// SessionProfile
///
/// The resolved identity of the caller (GET /api/me).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionProfile {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}
