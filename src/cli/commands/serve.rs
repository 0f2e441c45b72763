use anyhow::{bail, Context};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::app::{app, cors_layer};
use crate::config::config;
use crate::database::{DatabaseManager, MemoryStorage, PgStorage, Storage};
use crate::handlers::AppState;
use crate::services::RecordService;

pub async fn handle(port: Option<u16>, memory: bool) -> anyhow::Result<()> {
    let config = config();
    tracing::info!("Starting NCC API in {:?} mode", config.environment);

    if config.security.jwt_secret.trim().is_empty() {
        bail!("JWT_SECRET must be set to start the server");
    }

    let storage: Arc<dyn Storage> = if memory {
        tracing::warn!("Using in-memory storage; data is lost on exit");
        Arc::new(MemoryStorage::new())
    } else {
        if config.database.url.is_none() {
            bail!("DATABASE_URL must be set (or pass --memory)");
        }
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to PostgreSQL")?;
        Arc::new(PgStorage::new(pool))
    };

    let service = RecordService::new(storage, config.rules.clone());
    let state = AppState::new(service, config.security.jwt_secret.clone(), config.security.admin_role.clone());

    let mut router = app(state);
    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    let port = port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("NCC API listening on http://{}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
