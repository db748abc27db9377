//! Pitstop API Server
//!
//! Main entry point for the Pitstop attachment service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pitstop_api::{AppState, create_router};
use pitstop_core::storage::{StorageConfig, StorageService};
use pitstop_db::connect;
use pitstop_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitstop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .context("JWT expiry out of range")?,
    };
    let jwt_service = JwtService::new(jwt_config);

    let storage = match &config.storage {
        Some(settings) => {
            let storage_config = StorageConfig::from_settings(settings)
                .context("Invalid storage configuration")?;
            let service = StorageService::from_config(storage_config)
                .context("Failed to initialize storage")?;
            info!(
                provider = service.provider_name(),
                bucket = service.bucket(),
                "Storage configured"
            );
            Some(Arc::new(service))
        }
        None => {
            warn!("No storage configured; uploads and deletes will be rejected");
            None
        }
    };

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
