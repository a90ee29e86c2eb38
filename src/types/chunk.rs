//! Chunk type definitions.

use serde::{Deserialize, Serialize};

/// A chunk of document text sized for retrieval.
///
/// Chunks are the fundamental unit of content that gets indexed for RAG.
/// `char_count` is measured in Unicode characters, not bytes, and always
/// refers to the trimmed `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text, trimmed of surrounding whitespace
    pub text: String,

    /// Number of characters in `text`
    #[serde(rename = "charCount")]
    pub char_count: usize,

    /// Whether this chunk is a leaf in the retrieval tree
    #[serde(rename = "isLeaf")]
    pub is_leaf: bool,
}

impl Chunk {
    /// Create a chunk, computing its character count from the text.
    pub fn new(text: String) -> Self {
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            is_leaf: true,
        }
    }

    /// Get the length of the chunk text in characters.
    pub fn len(&self) -> usize {
        self.char_count
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Size metadata recorded for a chunk in `_rag` blocks.
///
/// The chunk text itself lives in the node's `description`; this stamp
/// carries just the counters TreeListy needs for retrieval bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMeta {
    /// Number of characters in the chunk text
    pub char_count: usize,

    /// Whether the chunk is a leaf in the retrieval tree
    pub is_leaf: bool,
}

impl From<&Chunk> for ChunkMeta {
    fn from(chunk: &Chunk) -> Self {
        Self {
            char_count: chunk.char_count,
            is_leaf: chunk.is_leaf,
        }
    }
}
