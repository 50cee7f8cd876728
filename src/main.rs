mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use config::Config;
use error::StartupError;
use handlers::rest;
use repository::Database;
use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let cfg = Config::from_env()?;
    tracing::info!(
        "Config loaded: db={}@{}:{}/{}, port={}",
        cfg.db_user,
        cfg.db_host,
        cfg.db_port,
        cfg.db_name,
        cfg.port
    );

    // Database readiness and schema
    let db = Database::new(&cfg);
    db.wait_for_database(cfg.db_max_retries, cfg.retry_delay())
        .await?;
    db.init_schema().await?;

    // Router config
    let service = Arc::new(NoteService::new(db));
    let router = rest::router(service);

    let listener = tokio::net::TcpListener::bind(cfg.listen_addr()).await?;
    tracing::info!("Started listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
