//! Export configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CONTENT_KB, DEFAULT_MAX_DEPTH, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE,
};

/// Settings for a folder export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Folder to scan
    pub folder_path: PathBuf,

    /// Directory the JSON tree is written to
    pub output_dir: PathBuf,

    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Maximum folder depth to scan
    pub max_depth: usize,

    /// Whether filesystem exports pull file content into the tree
    pub extract_content: bool,

    /// Per-file content budget in KB
    pub max_content_kb: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            folder_path: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            extract_content: true,
            max_content_kb: DEFAULT_MAX_CONTENT_KB,
        }
    }
}

impl ExportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            folder_path: std::env::var("EXPORT_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            chunk_size: clamp_chunk_size(
                std::env::var("CHUNK_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_CHUNK_SIZE),
            ),
            max_depth: std::env::var("MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_DEPTH),
            extract_content: std::env::var("EXTRACT_CONTENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            max_content_kb: std::env::var("MAX_CONTENT_KB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONTENT_KB),
        }
    }

    /// Set the folder to scan.
    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder_path = folder.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the chunk size, clamped to the supported range.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = clamp_chunk_size(size);
        self
    }

    /// Set the maximum scan depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Clamp a requested chunk size into the supported range.
pub fn clamp_chunk_size(size: usize) -> usize {
    size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}
