//! Core types for the export toolkit.

mod chunk;
mod config;
mod node;
mod source;
mod stats;

pub use chunk::{Chunk, ChunkMeta};
pub use config::{clamp_chunk_size, ExportConfig};
pub use node::{
    ChunkNode, ChunkRag, DocumentNode, DocumentRag, ExternalRef, FileNode, FileRag,
    FilesystemRoot, FolderNode, KnowledgeNode, KnowledgeRoot, NodeKind, PhaseNode, RagSource,
    RootRag,
};
pub use source::{Pattern, SyncSource};
pub use stats::{ExportStats, ExtractionStats};
