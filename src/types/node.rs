//! TreeListy node record types.
//!
//! One record type per node kind, replacing the loose maps the export
//! format grew out of. Field names follow the TreeListy JSON schema
//! (camelCase, `type`, `_rag`), so every struct serializes straight into
//! an importable tree.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::chunk::ChunkMeta;
use super::source::{Pattern, SyncSource};
use super::stats::ExportStats;

/// Structural role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Phase,
    Item,
}

/// Link from a node back to the thing it was exported from.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ExternalRef {
    /// A folder on disk
    #[serde(rename = "local:folder")]
    Folder { id: String },

    /// A file on disk
    #[serde(rename = "local:file")]
    File { id: String },

    /// One chunk of an extracted file
    #[serde(rename = "local:chunk")]
    Chunk {
        #[serde(rename = "fileId")]
        file_id: String,
        #[serde(rename = "chunkIndex")]
        chunk_index: usize,
    },
}

/// Child of a knowledge-base root: either a folder or a document.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum KnowledgeNode {
    Folder(FolderNode),
    Document(DocumentNode),
}

/// Folder grouping inside a knowledge-base tree.
///
/// Only folders that contain extractable documents make it into the tree.
#[derive(Debug, Clone, Serialize)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub icon: String,
    pub external: ExternalRef,
    pub children: Vec<KnowledgeNode>,
}

/// RAG provenance carried by a document node.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRag {
    pub source: RagSource,

    /// Present when the whole document fits in a single chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<ChunkMeta>,
}

/// Where a document's text came from and when it was pulled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagSource {
    /// Source kind, always "local-file"
    #[serde(rename = "type")]
    pub kind: String,

    /// Resolved path, doubling as the stable file id
    pub file_id: String,

    pub file_name: String,

    /// Format label, e.g. "Markdown" or "CSV"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,

    pub extracted_at: DateTime<Utc>,
}

/// A document whose text was extracted and chunked.
///
/// A single-chunk document embeds the chunk text in its own `description`;
/// a multi-chunk document carries one [`ChunkNode`] per chunk in `items`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub icon: String,
    pub external: ExternalRef,
    #[serde(rename = "_rag")]
    pub rag: DocumentRag,
    #[serde(rename = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ChunkNode>>,
}

/// RAG metadata carried by a chunk node.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkRag {
    pub chunk: ChunkMeta,
}

/// One retrieval chunk of a document, attached under `items`.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkNode {
    pub id: String,
    pub name: String,
    /// The chunk text itself
    pub description: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub icon: String,
    pub external: ExternalRef,
    #[serde(rename = "_rag")]
    pub rag: ChunkRag,
}

/// Stats block carried by a knowledge-base root.
#[derive(Debug, Clone, Serialize)]
pub struct RootRag {
    pub stats: ExportStats,
}

/// Root of a knowledge-base tree.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeRoot {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub icon: String,
    pub expanded: bool,
    pub pattern: Pattern,
    pub source: SyncSource,
    #[serde(rename = "_rag")]
    pub rag: RootRag,
    pub children: Vec<KnowledgeNode>,
}

/// Flat RAG block on a filesystem node with extracted content.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRag {
    /// File name
    pub source: String,

    /// Source kind, always "local-file"
    pub source_type: String,

    /// Resolved path, doubling as the stable source id
    pub source_id: String,

    pub source_path: String,

    /// When the content was pulled
    pub imported: DateTime<Utc>,

    /// Characters stored in the node description
    pub char_count: usize,
}

/// File or folder entry in a filesystem tree.
///
/// Folders carry `children` (when non-empty) and start collapsed; files
/// optionally carry extracted content in `description` plus a [`FileRag`]
/// block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    /// Resolved path, used directly as the node id
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub icon: String,
    pub is_folder: bool,
    /// Extension including the dot, empty for folders
    pub file_extension: String,
    /// Size in bytes, zero for folders
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "_rag", skip_serializing_if = "Option::is_none")]
    pub rag: Option<FileRag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

/// Wrapper phase holding the scanned folder inside a filesystem root.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub icon: String,
    pub expanded: bool,
    pub children: Vec<FileNode>,
}

/// Root of a filesystem tree.
#[derive(Debug, Clone, Serialize)]
pub struct FilesystemRoot {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub icon: String,
    pub expanded: bool,
    pub source: SyncSource,
    pub children: Vec<PhaseNode>,
    pub pattern: Pattern,
}
