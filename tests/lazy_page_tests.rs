mod common;

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use app_shell::{
    config::Env,
    lazy::{Deferred, LazyPage, PageLoadError, PageLoader},
    pages::Page,
    routes::table::RouteDescriptor,
};
use async_trait::async_trait;
use axum::http::{StatusCode, header};
use common::*;
use tokio::sync::Notify;

/// Loader that blocks until released and counts how often it was started.
struct GatedLoader {
    release: Arc<Notify>,
    calls: Arc<AtomicUsize>,
    marker: &'static str,
}

#[async_trait]
impl PageLoader for GatedLoader {
    async fn load(&self) -> Result<Arc<dyn Page>, PageLoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(Arc::new(TextPage(self.marker)))
    }
}

struct FailingLoader;

#[async_trait]
impl PageLoader for FailingLoader {
    async fn load(&self) -> Result<Arc<dyn Page>, PageLoadError> {
        Err(PageLoadError::new("bundle missing"))
    }
}

struct PanickingLoader;

#[async_trait]
impl PageLoader for PanickingLoader {
    async fn load(&self) -> Result<Arc<dyn Page>, PageLoadError> {
        panic!("loader crashed");
    }
}

fn routes_with(path: &'static str, component: Arc<LazyPage>, is_secure: bool) -> Vec<RouteDescriptor> {
    let mut routes = scenario_routes();
    routes.push(RouteDescriptor::new(path, "Reports", component, is_secure));
    routes
}

#[tokio::test]
async fn test_fallback_shown_until_unit_resolves() {
    let release = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let component = LazyPage::new(
        "reports",
        GatedLoader {
            release: release.clone(),
            calls: calls.clone(),
            marker: "reports-content",
        },
    );
    let state = create_app_state(Env::Production, routes_with("/reports", component.clone(), false));
    let router = app_shell::create_router(state);

    let response = send(&router, get("/reports")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    let body = body_text(response).await;
    assert!(body.contains("Loading..."));
    assert!(body.contains("http-equiv=\"refresh\""));
    assert!(!body.contains("reports-content"));

    // Still pending: a second navigation gets the fallback and does not restart the loader.
    let body = body_text(send(&router, get("/reports")).await).await;
    assert!(body.contains("Loading..."));

    release.notify_one();
    component.load().await.expect("unit resolves");

    let body = body_text(send(&router, get("/reports")).await).await;
    assert!(body.contains("reports-content"));
    assert!(!body.contains("Loading..."));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_unit_surfaces_error_page() {
    let component = LazyPage::new("reports", FailingLoader);
    let state = create_app_state(Env::Production, routes_with("/reports", component.clone(), false));
    let router = app_shell::create_router(state);

    assert!(component.load().await.is_err());

    let response = send(&router, get("/reports")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("This page could not be loaded."));

    // The failure is cached, not retried.
    let response = send(&router, get("/reports")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_panicking_loader_settles_as_failed() {
    let component = LazyPage::new("reports", PanickingLoader);
    let state = create_app_state(Env::Production, routes_with("/reports", component.clone(), false));
    let router = app_shell::create_router(state);

    let outcome = tokio::time::timeout(Duration::from_secs(2), component.load())
        .await
        .expect("load settles after a loader panic");
    assert_eq!(outcome.err(), Some(PageLoadError::new("page loader panicked")));

    let response = send(&router, get("/reports")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("This page could not be loaded."));
}

#[tokio::test]
async fn test_gate_runs_before_unit_is_loaded() {
    let calls = Arc::new(AtomicUsize::new(0));
    let component = LazyPage::new(
        "reports",
        GatedLoader {
            release: Arc::new(Notify::new()),
            calls: calls.clone(),
            marker: "reports-content",
        },
    );
    let state = create_app_state(Env::Production, routes_with("/reports", component.clone(), true));
    let router = app_shell::create_router(state);

    let response = send(&router, get("/reports")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!component.is_ready());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_secure_fallback_renders_without_chrome() {
    let component = LazyPage::new(
        "reports",
        GatedLoader {
            release: Arc::new(Notify::new()),
            calls: Arc::new(AtomicUsize::new(0)),
            marker: "reports-content",
        },
    );
    let state = create_app_state(Env::Production, routes_with("/reports", component, true));
    let router = app_shell::create_router(state);

    let response = send(&router, get_with_bearer("/reports", &valid_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Loading..."));
    assert!(!body.contains("data-sidebar=\"sidebar\""));
    assert!(!body.contains("reports-content"));
}

#[tokio::test]
async fn test_deferred_loader_builds_page_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let component = LazyPage::new(
        "deferred",
        Deferred(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            TextPage("deferred-content")
        }),
    );

    assert!(!component.is_ready());
    component.load().await.unwrap();
    component.load().await.unwrap();

    assert!(component.is_ready());
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ready_unit_needs_no_loader() {
    let component = LazyPage::ready("home", TextPage("home-content"));

    assert!(component.is_ready());
    assert!(component.load().await.is_ok());
    assert_eq!(component.name(), "home");
}
