//! HTTP request handlers for the refresh service.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::pipeline::{self, ExportPattern};
use crate::types::{clamp_chunk_size, ExportConfig};

/// Application state shared across handlers.
pub struct AppState {
    pub config: ExportConfig,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
    message: String,
}

/// Health check endpoint.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        message: "TreeListy server is ready".to_string(),
    })
}

/// Source metadata sent back by TreeListy for a targeted refresh.
///
/// Mirrors the `source` block written into exported trees; every field
/// is optional and falls back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshSource {
    pub folder_path: Option<String>,
    pub folder_name: Option<String>,
    pub sync_depth: Option<usize>,
    pub chunk_size: Option<usize>,
    pub content_extracted: Option<bool>,
}

/// Body of a refresh request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub source: Option<RefreshSource>,
}

/// Successful refresh response carrying the fresh tree.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    success: bool,
    filename: String,
    file_size: u64,
    modified: DateTime<Utc>,
    data: Value,
}

/// Failed refresh response.
#[derive(Debug, Serialize)]
pub struct RefreshError {
    success: bool,
    error: String,
}

/// Re-run the folder export and return the fresh tree.
///
/// The body is optional. When TreeListy sends back the `source` block of
/// an earlier export, its settings override the configured defaults and
/// select the matching pattern: a filesystem block carries
/// `contentExtracted`, a knowledge-base block does not.
pub async fn refresh_folder(
    State(state): State<Arc<AppState>>,
    request: Option<Json<RefreshRequest>>,
) -> Result<Json<RefreshResponse>, (StatusCode, Json<RefreshError>)> {
    let source = request
        .map(|Json(body)| body.source.unwrap_or_default())
        .unwrap_or_default();

    let mut config = state.config.clone();
    if let Some(path) = &source.folder_path {
        config.folder_path = path.into();
    }
    if let Some(depth) = source.sync_depth {
        config.max_depth = depth;
    }
    if let Some(size) = source.chunk_size {
        config.chunk_size = clamp_chunk_size(size);
    }
    if let Some(extract) = source.content_extracted {
        config.extract_content = extract;
    }

    let pattern = if source.content_extracted.is_some() {
        ExportPattern::Filesystem
    } else {
        ExportPattern::KnowledgeBase
    };

    info!(
        folder = %config.folder_path.display(),
        pattern = ?pattern,
        "Refresh request received"
    );

    let outcome = tokio::task::spawn_blocking(move || pipeline::run_export(pattern, &config))
        .await
        .map_err(|e| refresh_error(format!("export task failed: {}", e)))?
        .map_err(|e| refresh_error(format!("{:#}", e)))?;

    let metadata = std::fs::metadata(&outcome.output_path).ok();
    let file_size = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
    let modified = metadata
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(Utc::now);
    let filename = outcome
        .output_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    info!(filename = %filename, bytes = file_size, "Refresh finished");

    Ok(Json(RefreshResponse {
        success: true,
        filename,
        file_size,
        modified,
        data: outcome.tree,
    }))
}

fn refresh_error(error: String) -> (StatusCode, Json<RefreshError>) {
    error!(error = %error, "Refresh failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(RefreshError {
            success: false,
            error,
        }),
    )
}
