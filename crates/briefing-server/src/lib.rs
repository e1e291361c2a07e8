//! Briefing server library logic.

pub mod api_customers;
pub mod config;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use briefing_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Directory for uploaded reference files.
    pub upload_dir: String,
    /// Directory holding `index.html` and the `static/` assets.
    pub frontend_dir: String,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/clientes", get(api_customers::list_customers_handler))
        .route(
            "/cadastrar_cliente",
            // The intake contract puts no cap on attachment size.
            post(api_customers::create_customer_handler).layer(DefaultBodyLimit::disable()),
        );

    // Serve uploaded reference files under /uploads/*. The directory is
    // created at startup; missing files come back as plain 404s.
    let router = router.nest_service("/uploads", ServeDir::new(&state.upload_dir));

    // Serve the intake frontend: index.html at / and assets under /static/*.
    let frontend_dir = std::path::Path::new(&state.frontend_dir);
    let index_path = frontend_dir.join("index.html");
    if index_path.exists() {
        tracing::info!(path = %state.frontend_dir, "serving frontend index and static assets");
    } else {
        tracing::warn!(
            path = %state.frontend_dir,
            "frontend index.html not found, / will return 404"
        );
    }
    let router = router
        .route_service("/", ServeFile::new(index_path))
        .nest_service("/static", ServeDir::new(frontend_dir.join("static")));

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
