//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication and admin-authorization middleware
//! - JSON error mapping for core errors

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use folio_core::auth::AdminAllowlist;
use folio_core::catalog::CatalogService;
use folio_core::download::DownloadService;
use folio_core::storage::StorageService;
use folio_core::upload::{OwnerLocks, UploadService};
use folio_db::AppRepository;
use folio_shared::JwtService;
use folio_shared::config::UploadConfig;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Object storage for packages and images.
    pub storage: Arc<StorageService>,
    /// Emails promoted to admin on first sight.
    pub admin_allowlist: Arc<AdminAllowlist>,
    /// Upload workflow settings.
    pub upload: UploadConfig,
    /// Per-app upload locks, when serialisation is enabled.
    pub owner_locks: Option<Arc<OwnerLocks>>,
    records: Arc<AppRepository>,
}

impl AppState {
    /// Creates the state; owner locks are allocated when the upload config
    /// asks for per-app serialisation.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        jwt_service: JwtService,
        storage: StorageService,
        admin_allowlist: AdminAllowlist,
        upload: UploadConfig,
    ) -> Self {
        let owner_locks = upload
            .serialize_per_owner
            .then(|| Arc::new(OwnerLocks::new()));
        Self {
            records: Arc::new(AppRepository::new(Arc::clone(&db))),
            db,
            jwt_service: Arc::new(jwt_service),
            storage: Arc::new(storage),
            admin_allowlist: Arc::new(admin_allowlist),
            upload,
            owner_locks,
        }
    }

    /// Catalog service over the shared record store and storage.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<AppRepository, StorageService> {
        CatalogService::new(Arc::clone(&self.records), Arc::clone(&self.storage))
    }

    /// Download resolver.
    #[must_use]
    pub fn downloads(&self) -> DownloadService<AppRepository, StorageService> {
        DownloadService::new(Arc::clone(&self.records), Arc::clone(&self.storage))
    }

    /// Upload service configured from the upload settings.
    #[must_use]
    pub fn uploads(&self) -> UploadService<AppRepository, StorageService> {
        let service = UploadService::new(Arc::clone(&self.records), Arc::clone(&self.storage))
            .with_schema_drift(self.upload.schema_drift);
        match &self.owner_locks {
            Some(locks) => service.with_owner_locks(Arc::clone(locks)),
            None => service,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
