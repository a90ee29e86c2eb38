//! TreeListy Export Library
//!
//! Turns local folders into TreeListy-importable JSON trees, with text
//! extraction and boundary-preserving chunking for RAG. Ships two export
//! patterns (knowledge-base and filesystem) and a local refresh server.

pub mod api;
pub mod chunker;
pub mod extract;
pub mod pipeline;
pub mod scan;
pub mod tree;
pub mod types;

pub use chunker::{chunk_text, TextChunker};
pub use extract::{ContentExtractor, ExtractError};
pub use pipeline::{run_export, ExportOutcome, ExportPattern};
pub use scan::{FolderScanner, ScannedEntry};
pub use types::{Chunk, ExportConfig, ExportStats, ExtractionStats};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunker::{chunk_text, TextChunker};
    pub use crate::extract::ContentExtractor;
    pub use crate::pipeline::{run_export, ExportOutcome, ExportPattern};
    pub use crate::scan::FolderScanner;
    pub use crate::types::*;
}

/// Default target chunk size in characters (roughly 250-500 tokens)
pub const DEFAULT_CHUNK_SIZE: usize = 1500;

/// Largest chunk size a caller may request
pub const MAX_CHUNK_SIZE: usize = 4000;

/// Smallest chunk size a caller may request
pub const MIN_CHUNK_SIZE: usize = 200;

/// Default maximum folder depth to scan
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default per-file content budget in KB
pub const DEFAULT_MAX_CONTENT_KB: usize = 100;

/// Files with this many characters or fewer are treated as empty
pub const MIN_EXTRACT_CHARS: usize = 50;
