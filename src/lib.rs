//! Local Library catalog server
//!
//! Server-rendered pages for browsing and adding authors, books, book copies
//! and genres, backed by PostgreSQL.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod templates;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;
use templates::Templates;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub templates: Arc<Templates>,
}

impl AppState {
    /// Wire services over `repository` and compile the page templates
    pub fn new(repository: Repository) -> AppResult<Self> {
        Ok(Self {
            services: Arc::new(Services::new(repository)),
            templates: Arc::new(Templates::new()?),
        })
    }
}

/// Create the application router with all routes
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(api::catalog::home))
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .nest(models::CATALOG_ROOT, api::catalog_routes())
        .with_state(state);

    Router::new()
        .merge(pages)
        .merge(api::openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
