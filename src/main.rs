mod api;
mod config;
mod storage;

use crate::api::AppState;
use crate::config::{AppConfig, StoreBackend};
use crate::storage::{DocumentStore, MemoryStore, MongoStore};
use axum::{extract::Request, ServiceExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting PetForce API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Backend: {:?}", config.database.backend);
    info!("   - Database: {}", config.database.name);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    // Open the store once; every handler shares this handle
    let store: Arc<dyn DocumentStore> = match config.database.backend {
        StoreBackend::Mongo => {
            info!("💾 Connecting to database...");
            let uri = config.database.connection_uri()?;
            match MongoStore::connect(&uri, &config.database.name).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!(error = %e, "Database connection failed");
                    return Err(e.into());
                }
            }
        }
        StoreBackend::Memory => {
            warn!("⚠️  Using in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    info!("✅ Database ready");

    let app = api::router(AppState::new(store.as_ref()));

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET    /                - Liveness");
    info!("   GET    /services        - List services");
    info!("   GET    /limitedservice  - First 4 services");
    info!("   POST   /services        - Create service");
    info!("   GET    /service/{{id}}    - Get service");
    info!("   PUT    /service/{{id}}    - Upsert service");
    info!("   DELETE /service/{{id}}    - Delete service");
    info!("   GET    /gallery         - List gallery");
    info!("   GET    /reviews         - List reviews (?email=)");
    info!("   POST   /reviews         - Add review");
    info!("   GET    /review/{{id}}     - Reviews for a service");
    info!("   PUT    /review/{{id}}     - Upsert review text");
    info!("   DELETE /review/{{id}}     - Delete review");
    info!("   GET    /blogs           - List blogs");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
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

    info!("🛑 Shutdown signal received");
}
