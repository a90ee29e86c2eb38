//! TreeListy Export Service - Main Entry Point
//!
//! Local refresh server that re-exports a folder as a TreeListy tree.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use treelisty_export::api::handlers::{self, AppState};
use treelisty_export::types::ExportConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "treelisty_export=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ExportConfig::from_env();

    info!(
        "Starting TreeListy Export Service v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        folder = %config.folder_path.display(),
        chunk_size = config.chunk_size,
        max_depth = config.max_depth,
        "Export configuration"
    );

    let state = Arc::new(AppState { config });

    // Build HTTP routes
    let app = Router::new()
        // Health check
        .route("/status", get(handlers::status))
        // Folder refresh
        .route("/refresh-folder", post(handlers::refresh_folder))
        // State
        .with_state(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
