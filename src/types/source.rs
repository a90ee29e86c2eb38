//! Tree pattern and sync-source blocks.
//!
//! These sit on the root node and tell TreeListy which layout pattern to
//! apply and where the tree came from, so a later refresh can re-run the
//! same export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout pattern marker on a root node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// Pattern key, e.g. "knowledge-base" or "filesystem"
    pub key: String,
}

impl Pattern {
    /// Pattern for chunked document trees.
    pub fn knowledge_base() -> Self {
        Self {
            key: "knowledge-base".to_string(),
        }
    }

    /// Pattern for folder metadata trees.
    pub fn filesystem() -> Self {
        Self {
            key: "filesystem".to_string(),
        }
    }
}

/// Provenance block describing the folder an export was taken from.
///
/// `chunk_size` is present on knowledge-base exports, `content_extracted`
/// on filesystem exports; the other fields are shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSource {
    /// Source kind, always "local-folder"
    #[serde(rename = "type")]
    pub kind: String,

    /// Resolved path of the exported folder
    pub folder_path: String,

    /// Display name of the exported folder
    pub folder_name: String,

    /// When the export ran
    pub last_sync: DateTime<Utc>,

    /// Folder depth the scan was allowed to reach
    pub sync_depth: usize,

    /// Chunk size used when splitting document text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    /// Whether file content was extracted into the tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_extracted: Option<bool>,
}

impl SyncSource {
    /// Source block for a knowledge-base export.
    pub fn knowledge_base(
        folder_path: String,
        folder_name: String,
        sync_depth: usize,
        chunk_size: usize,
    ) -> Self {
        Self {
            kind: "local-folder".to_string(),
            folder_path,
            folder_name,
            last_sync: Utc::now(),
            sync_depth,
            chunk_size: Some(chunk_size),
            content_extracted: None,
        }
    }

    /// Source block for a filesystem export.
    pub fn filesystem(
        folder_path: String,
        folder_name: String,
        sync_depth: usize,
        content_extracted: bool,
    ) -> Self {
        Self {
            kind: "local-folder".to_string(),
            folder_path,
            folder_name,
            last_sync: Utc::now(),
            sync_depth,
            chunk_size: None,
            content_extracted: Some(content_extracted),
        }
    }
}
