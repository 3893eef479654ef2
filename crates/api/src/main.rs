use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harbor_api::config::ServerConfig;
use harbor_api::router::build_app_router;
use harbor_api::state::AppState;
use harbor_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "harbor_api=debug,harbor_db=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr();
    tracing::info!(
        %addr,
        cors_origins = ?config.cors_origins,
        request_timeout_secs = config.request_timeout_secs,
        "Loaded server configuration",
    );

    let pool = connect_database(&config).await;

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Harbor API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Harbor API stopped");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the pool, verify connectivity and bring the schema up to date.
///
/// The booking overlap constraints live in the migrations, so the server
/// refuses to start on a schema that has not been migrated.
async fn connect_database(config: &ServerConfig) -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = harbor_db::create_pool(&database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    harbor_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    harbor_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(max_connections = config.db_max_connections, "Database ready");
    pool
}

/// Resolve on SIGINT or SIGTERM so in-flight bookings can commit.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down, draining open requests");
}
