mod common;

use axum::http::StatusCode;
use common::*;

const CHROME_MARKER: &str = "data-sidebar=\"sidebar\"";

#[tokio::test]
async fn test_root_redirects_to_default_route() {
    let router = scenario_router();

    let response = send(&router, get("/")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/home");
}

#[tokio::test]
async fn test_unknown_paths_redirect_to_default_route() {
    let router = scenario_router();

    for path in [
        "/unknown",
        "/settings/",
        "/home/extra",
        "/a/b/c",
        "/does-not-exist?with=query",
    ] {
        let response = send(&router, get(path)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(response.headers()), "/home", "path {path}");
    }
}

#[tokio::test]
async fn test_default_route_renders_without_chrome() {
    let router = scenario_router();

    let response = send(&router, get("/home")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("home-content"));
    assert!(!body.contains(CHROME_MARKER));
}

#[tokio::test]
async fn test_public_route_has_no_chrome_when_authenticated() {
    let router = scenario_router();

    let response = send(&router, get_with_bearer("/home", &valid_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("home-content"));
    assert!(!body.contains(CHROME_MARKER));
}

#[tokio::test]
async fn test_secure_route_redirects_when_unauthenticated() {
    let router = scenario_router();

    let response = send(&router, get("/settings")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/login?next=%2Fsettings");
    assert!(set_cookie_value(response.headers(), "toast").is_some());

    let body = body_text(response).await;
    assert!(!body.contains("settings-content"));
}

#[tokio::test]
async fn test_gate_keeps_query_in_next() {
    let router = scenario_router();

    let response = send(&router, get("/settings?tab=profile")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(response.headers()),
        "/login?next=%2Fsettings%3Ftab%3Dprofile"
    );
}

#[tokio::test]
async fn test_secure_route_rejects_expired_token() {
    let router = scenario_router();
    let expired = create_token(TEST_USER_ID, -3600);

    let response = send(&router, get_with_bearer("/settings", &expired)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(response.headers()).starts_with("/login"));
}

#[tokio::test]
async fn test_secure_route_renders_inside_chrome_when_authenticated() {
    let router = scenario_router();

    let response = send(&router, get_with_bearer("/settings", &valid_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("settings-content"));
    assert!(body.contains(CHROME_MARKER));
    // Header chrome: trigger, breadcrumb ending in the route title, session email.
    assert!(body.contains("data-sidebar=\"trigger\""));
    assert!(body.contains("<span aria-current=\"page\">Settings</span>"));
    assert!(body.contains("member@example.com"));
}

#[tokio::test]
async fn test_secure_route_accepts_session_cookie() {
    let router = scenario_router();
    let cookie = format!("session={}", valid_token());

    let response = send(&router, get_with_cookie("/settings", &cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("settings-content"));
}

#[tokio::test]
async fn test_sidebar_lists_only_secure_routes() {
    let router = scenario_router();

    let response = send(&router, get_with_bearer("/settings", &valid_token())).await;
    let body = body_text(response).await;

    assert!(body.contains("href=\"/settings\" aria-current=\"page\""));
    assert!(!body.contains("href=\"/login\""));
}

#[tokio::test]
async fn test_sidebar_state_cookie_collapses_chrome() {
    let router = scenario_router();
    let cookie = format!("session={}; sidebar_state=collapsed", valid_token());

    let response = send(&router, get_with_cookie("/settings", &cookie)).await;
    let body = body_text(response).await;

    assert!(body.contains("data-state=\"collapsed\""));
}

#[tokio::test]
async fn test_health_check() {
    let router = scenario_router();

    let response = send(&router, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_openapi_lists_every_form_action() {
    let router = scenario_router();

    let response = send(&router, get("/api-docs/openapi.json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    for path in ["/auth/session", "/auth/logout", "/theme", "/sidebar/toggle"] {
        assert!(doc["paths"][path]["post"].is_object(), "{path} documented");
    }
    assert!(doc["components"]["schemas"]["ReturnTo"].is_object());
}
