//! # Stockroom API Server
//!
//! Loads configuration, opens the database (running migrations) and serves
//! HTTP until SIGINT/SIGTERM.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom_api::{router, ApiConfig, AppState};
use stockroom_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockroom=info")),
        )
        .with_target(true)
        .init();

    info!("Starting Stockroom API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        app = %config.app_name,
        addr = %config.bind_address(),
        prefix = %config.api_prefix,
        database = %config.database_path.display(),
        low_stock_policy = ?config.low_stock_policy,
        "Configuration loaded"
    );

    // Connect to database (migrations run on connect)
    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    let bind_addr = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
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
