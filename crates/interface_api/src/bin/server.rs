//! Enrollment API server binary
//!
//! This binary starts the HTTP API server for the enrollment system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin enrollment-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin enrollment-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string
//! * `API_RECEIPT_DIR` - Directory for receipt files (default: ./receipts)
//! * `API_PLATFORM_BASE_URL` - Course platform API base URL
//! * `API_PLATFORM_API_KEY` - Course platform API key
//! * `API_PLATFORM_ENABLED` - Enable the course platform integration (default: false)
//! * `API_CHAT_BASE_URL` - Chat gateway API base URL
//! * `API_CHAT_API_KEY` - Chat gateway API key
//! * `API_INTEGRATION_TIMEOUT_MS` - Outbound call timeout (default: 10000)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_enrollment::{
    ChatInviteConfig, CoursePlatformConfig, EnrollmentNotifier, EnrollmentService,
    FsReceiptStorage, HttpChatInvite, HttpCoursePlatform, NotifierConfig,
};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresCourseMappings,
    PostgresEnrollmentStore};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting enrollment API server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url)).await?;
    run_migrations(&pool).await?;

    let store = Arc::new(PostgresEnrollmentStore::new(pool.clone()));
    let mappings = Arc::new(PostgresCourseMappings::new(pool.clone()));
    let platform = Arc::new(HttpCoursePlatform::new(CoursePlatformConfig {
        base_url: config.platform_base_url.clone(),
        api_key: config.platform_api_key.clone(),
        timeout: config.integration_timeout(),
    })?);
    let chat = Arc::new(HttpChatInvite::new(ChatInviteConfig {
        base_url: config.chat_base_url.clone(),
        api_key: config.chat_api_key.clone(),
        timeout: config.integration_timeout(),
    })?);
    let notifier = Arc::new(EnrollmentNotifier::new(
        mappings,
        platform,
        chat,
        NotifierConfig {
            platform_enabled: config.platform_enabled,
            call_timeout: config.integration_timeout(),
        },
    ));
    let receipt_storage = Arc::new(FsReceiptStorage::new(&config.receipt_dir));
    let service = Arc::new(EnrollmentService::new(store, notifier, receipt_storage));

    let state = AppState {
        service,
        pool,
        config: config.clone(),
    };
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables, falling back to
/// individual variables and then defaults.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|_| {
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("API_DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            log_level: std::env::var("API_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            receipt_dir: std::env::var("API_RECEIPT_DIR").unwrap_or(defaults.receipt_dir),
            platform_base_url: std::env::var("API_PLATFORM_BASE_URL")
                .unwrap_or(defaults.platform_base_url),
            platform_api_key: std::env::var("API_PLATFORM_API_KEY")
                .unwrap_or(defaults.platform_api_key),
            platform_enabled: std::env::var("API_PLATFORM_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.platform_enabled),
            chat_base_url: std::env::var("API_CHAT_BASE_URL").unwrap_or(defaults.chat_base_url),
            chat_api_key: std::env::var("API_CHAT_API_KEY").unwrap_or(defaults.chat_api_key),
            integration_timeout_ms: std::env::var("API_INTEGRATION_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.integration_timeout_ms),
        }
    })
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Completes when the process receives SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
