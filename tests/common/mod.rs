#![allow(dead_code)]

use std::{sync::Arc, time::SystemTime};

use app_shell::{
    AppConfig, AppState, InMemoryUserDirectory, ShellError,
    auth::Claims,
    config::Env,
    lazy::LazyPage,
    models::User,
    pages::{Page, PageContext},
    routes::table::{RouteDescriptor, RouteTable},
};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, Response, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
pub const TEST_USER_ID: Uuid = Uuid::from_u128(1);

/// Page that renders a fixed marker, so tests can tell which unit was shown.
pub struct TextPage(pub &'static str);

impl Page for TextPage {
    fn render(&self, _ctx: &PageContext<'_>) -> Result<String, ShellError> {
        Ok(format!("<p>{}</p>", self.0))
    }
}

pub fn test_user() -> User {
    User {
        id: TEST_USER_ID,
        email: "member@example.com".to_string(),
        role: "member".to_string(),
    }
}

pub fn test_config(env: Env) -> AppConfig {
    AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    }
}

/// Signs a token for `user_id` that expires `exp_offset` seconds from now
/// (negative offsets produce already-expired tokens).
pub fn create_token(user_id: Uuid, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

pub fn valid_token() -> String {
    create_token(TEST_USER_ID, 3600)
}

/// The scenario table: a public home, a public login page and a secure settings page.
pub fn scenario_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/home", "Home", LazyPage::ready("home", TextPage("home-content")), false),
        RouteDescriptor::new("/login", "Sign in", LazyPage::ready("login", TextPage("login-content")), false),
        RouteDescriptor::new(
            "/settings",
            "Settings",
            LazyPage::ready("settings", TextPage("settings-content")),
            true,
        ),
    ]
}

pub fn create_app_state(env: Env, routes: Vec<RouteDescriptor>) -> AppState {
    let config = test_config(env);
    let table = RouteTable::new(routes, &config).expect("test route table is valid");
    AppState {
        config,
        users: Arc::new(InMemoryUserDirectory::new().with_user(test_user())),
        routes: Arc::new(table),
    }
}

pub fn scenario_router() -> Router {
    app_shell::create_router(create_app_state(Env::Production, scenario_routes()))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(headers: &HeaderMap) -> &str {
    headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// `name=value` pairs of every Set-Cookie header, attributes stripped.
pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(|raw| raw.split(';').next().unwrap_or("").trim().to_string())
        .collect()
}

pub fn set_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    set_cookies(headers).into_iter().find_map(|pair| {
        pair.strip_prefix(&format!("{name}="))
            .map(str::to_string)
    })
}
