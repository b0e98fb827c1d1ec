use std::sync::Arc;

use app_shell::{
    AppRoutes, AppState,
    config::{AppConfig, Env},
    create_router,
    directory::{InMemoryUserDirectory, PostgresUserDirectory, UserDirectoryState},
    models::User,
    routes::table::RouteTable,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// main
///
/// Initializes configuration, logging, the user directory and the route table, then
/// serves the shell until the process is stopped.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise verbose for the shell and request traces.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "app_shell=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. User directory: Postgres when configured, otherwise in memory.
    let users: UserDirectoryState = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");
            Arc::new(PostgresUserDirectory::new(pool))
        }
        None => {
            let mut directory = InMemoryUserDirectory::new();
            if config.env == Env::Local {
                let demo = User {
                    id: Uuid::from_u128(1),
                    email: "demo@localhost".to_string(),
                    role: "member".to_string(),
                };
                tracing::info!(user_id = %demo.id, "seeded demo user; send it as the x-user-id header");
                directory = directory.with_user(demo);
            } else {
                tracing::warn!("DATABASE_URL is not set; nobody will be able to sign in");
            }
            Arc::new(directory)
        }
    };

    // 4. Route table (validated once; an invalid table stops startup)
    let routes = RouteTable::from_provider(&AppRoutes, &config)
        .expect("FATAL: route table failed validation");
    tracing::info!(routes = routes.len(), "route table loaded");

    if config.preload_pages {
        for route in routes.iter() {
            if let Err(e) = route.component.load().await {
                tracing::error!(path = %route.path, error = %e, "preloading page failed");
            }
        }
    }

    // 5. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        config,
        users,
        routes: Arc::new(routes),
    };

    // 6. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check APP_BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API documentation available at http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}
