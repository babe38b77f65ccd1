use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use gemini_designer::GeminiDesigner;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod handlers;

pub use config::ServerConfig;

/// Room photos arrive base64-encoded inside JSON
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub designer: Arc<GeminiDesigner>,
}

impl AppState {
    pub fn new(designer: GeminiDesigner) -> Self {
        Self {
            designer: Arc::new(designer),
        }
    }
}

/// Create the Axum app with all routes and middleware
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/styles", get(handlers::list_styles))
        .route("/api/analyze", post(handlers::analyze_handler))
        .route("/api/transform", post(handlers::transform_handler))
        .route("/api/render", post(handlers::render_handler))
        .with_state(state);

    if let Some(dir) = &config.static_dir {
        info!("Serving frontend from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
