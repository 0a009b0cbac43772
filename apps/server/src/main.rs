//! # Billing HTTP Server
//!
//! The web binding of the billing system: a JSON REST surface over the
//! same store and command layer the desktop bridge uses.
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize tracing (RUST_LOG override, sensible default filter)
//! 2. Load configuration from environment
//! 3. Connect to SQLite (WAL mode) and run migrations
//! 4. Build the axum router with trace + CORS layers
//! 5. Serve until SIGINT/SIGTERM, then shut down gracefully
//! ```

mod config;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::AppState;
use billing_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting billing server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path.display(),
        "Configuration loaded"
    );

    // Connect to the database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database connected and migrations applied");

    // Build the router
    let state = Arc::new(AppState { db });
    let mut app = routes::router(state).layer(TraceLayer::new_for_http());
    if config.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    // Start serving
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=billing=trace` - Show trace for billing crates only
/// - Default: INFO level, sqlx noise filtered down
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,billing=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
