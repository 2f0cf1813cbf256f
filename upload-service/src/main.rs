use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod storage;

#[cfg(test)]
mod testing;

use config::Config;
use db::{MongoRepository, RecordStore};
use storage::{ObjectStore, S3Client};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub objects: Arc<dyn ObjectStore>,
    pub records: Arc<dyn RecordStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine, the process environment is authoritative
    dotenvy::dotenv().ok();

    shared::observability::init_service_logging("upload-service")?;

    info!("Starting Upload Service...");

    let config = Config::from_env()
        .map_err(|e| {
            error!("Configuration error: {}", e);
            e
        })
        .context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let s3_client = S3Client::new(&config.storage).await;
    info!("S3 client initialized successfully");

    let repository = MongoRepository::connect(&config.database)
        .await
        .context("Failed to initialize MongoDB client")?;

    let state = AppState {
        objects: Arc::new(s3_client),
        records: Arc::new(repository),
    };

    let cors = routes::cors_layer(&config.server.frontend_origin)
        .context("FRONTEND_ORIGIN is not a valid header value")?;

    let app = routes::router(state, cors, config.server.max_upload_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Upload Service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Upload Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
