//! Folio API Server
//!
//! Main entry point for the portfolio backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::{AppState, create_router};
use folio_core::auth::AdminAllowlist;
use folio_core::storage::{StorageConfig, StorageService};
use folio_db::connect_with_pool;
use folio_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!("Connected to database");

    // Object storage
    let storage = StorageService::from_config(StorageConfig::from(config.storage.clone()))
        .context("Failed to configure object storage")?;
    info!(
        provider = storage.provider_name(),
        package_bucket = %config.storage.package_bucket,
        image_bucket = %config.storage.image_bucket,
        "Object storage configured"
    );

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let allowlist = AdminAllowlist::parse(&config.admin.emails);
    if allowlist.is_empty() {
        warn!("Admin allowlist is empty; no account will be promoted to admin");
    } else {
        info!(admins = allowlist.len(), "Admin allowlist loaded");
    }

    info!(
        schema_drift = ?config.upload.schema_drift,
        serialize_per_owner = config.upload.serialize_per_owner,
        "Upload workflow configured"
    );

    let state = AppState::new(
        Arc::new(db),
        jwt_service,
        storage,
        allowlist,
        config.upload.clone(),
    );
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
