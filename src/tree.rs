//! TreeListy tree assembly.
//!
//! Builders that turn scanned entries, extracted text, and chunks into the
//! node records of the two export patterns, plus the timestamped JSON file
//! writer both pipelines share.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::extract::extension_label;
use crate::scan::ScannedEntry;
use crate::types::{
    Chunk, ChunkMeta, ChunkNode, ChunkRag, DocumentNode, DocumentRag, ExportStats, ExternalRef,
    FileNode, FileRag, FilesystemRoot, FolderNode, KnowledgeNode, KnowledgeRoot, NodeKind,
    Pattern, PhaseNode, RagSource, RootRag, SyncSource,
};

/// Generate a short unique node id.
pub fn generate_node_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("n_{}", &hex[..8])
}

/// Build one child node per chunk.
///
/// A lone chunk keeps the parent document's name; multiple chunks are
/// numbered from 1.
pub fn chunk_nodes(chunks: &[Chunk], parent_name: &str, file_id: &str) -> Vec<ChunkNode> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| ChunkNode {
            id: generate_node_id(),
            name: if chunks.len() > 1 {
                format!("Chunk {}", i + 1)
            } else {
                parent_name.to_string()
            },
            description: chunk.text.clone(),
            kind: NodeKind::Item,
            icon: "📝".to_string(),
            external: ExternalRef::Chunk {
                file_id: file_id.to_string(),
                chunk_index: i,
            },
            rag: ChunkRag {
                chunk: ChunkMeta::from(chunk),
            },
        })
        .collect()
}

/// Build a document node from a scanned file and its chunks.
///
/// A single chunk is embedded in the node's own description; multiple
/// chunks become child nodes under `items`.
pub fn document_node(entry: &ScannedEntry, chunks: Vec<Chunk>) -> DocumentNode {
    let file_type = extension_label(&entry.extension_lower()).map(|label| label.to_string());

    let mut node = DocumentNode {
        id: generate_node_id(),
        name: entry.name.clone(),
        kind: NodeKind::Item,
        icon: entry.icon().to_string(),
        external: ExternalRef::File {
            id: entry.path.clone(),
        },
        rag: DocumentRag {
            source: RagSource {
                kind: "local-file".to_string(),
                file_id: entry.path.clone(),
                file_name: entry.name.clone(),
                file_type,
                modified_time: entry.modified,
                extracted_at: Utc::now(),
            },
            chunk: None,
        },
        file_url: Some(format!("file://{}", entry.path)),
        description: None,
        items: None,
    };

    if chunks.len() > 1 {
        node.items = Some(chunk_nodes(&chunks, &entry.name, &entry.path));
    } else if let Some(only) = chunks.into_iter().next() {
        node.rag.chunk = Some(ChunkMeta::from(&only));
        node.description = Some(only.text);
    }

    node
}

/// Build a folder grouping node around already-built children.
pub fn folder_node(entry: &ScannedEntry, children: Vec<KnowledgeNode>) -> FolderNode {
    FolderNode {
        id: generate_node_id(),
        name: entry.name.clone(),
        kind: NodeKind::Phase,
        icon: "📁".to_string(),
        external: ExternalRef::Folder {
            id: entry.path.clone(),
        },
        children,
    }
}

/// Build the root of a knowledge-base tree.
pub fn knowledge_root(
    folder_name: &str,
    source: SyncSource,
    stats: ExportStats,
    children: Vec<KnowledgeNode>,
) -> KnowledgeRoot {
    KnowledgeRoot {
        id: "kb-local".to_string(),
        name: format!("📚 {} Knowledge Base", folder_name),
        kind: NodeKind::Root,
        icon: "📚".to_string(),
        expanded: true,
        pattern: Pattern::knowledge_base(),
        source,
        rag: RootRag { stats },
        children,
    }
}

/// Build a filesystem node from a scanned entry.
///
/// `content` carries extracted text for supported files; folders pass
/// their already-built children.
pub fn file_node(
    entry: &ScannedEntry,
    content: Option<String>,
    children: Option<Vec<FileNode>>,
) -> FileNode {
    let rag = content.as_ref().map(|text| FileRag {
        source: entry.name.clone(),
        source_type: "local-file".to_string(),
        source_id: entry.path.clone(),
        source_path: entry.path.clone(),
        imported: Utc::now(),
        char_count: text.chars().count(),
    });

    FileNode {
        id: entry.path.clone(),
        name: entry.name.clone(),
        kind: NodeKind::Item,
        icon: entry.icon().to_string(),
        is_folder: entry.is_dir,
        file_extension: entry.extension.clone(),
        file_size: entry.size,
        date_modified: entry.modified,
        date_created: entry.created,
        file_path: entry.path.clone(),
        description: content,
        rag,
        children,
        expanded: entry.is_dir.then_some(false),
    }
}

/// Build the root of a filesystem tree.
///
/// The scanned folder sits inside a single expanded phase wrapper under
/// the root.
pub fn filesystem_root(
    folder_path: &str,
    folder_name: &str,
    source: SyncSource,
    children: Vec<FileNode>,
) -> FilesystemRoot {
    FilesystemRoot {
        id: "root-local".to_string(),
        name: "💻 My Computer".to_string(),
        kind: NodeKind::Root,
        icon: "💻".to_string(),
        expanded: true,
        source,
        children: vec![PhaseNode {
            id: folder_path.to_string(),
            name: format!("📁 {}", folder_name),
            kind: NodeKind::Phase,
            icon: "📁".to_string(),
            expanded: true,
            children,
        }],
        pattern: Pattern::filesystem(),
    }
}

/// Serialize a tree to `<prefix>-<safe-name>-<timestamp>.json` under
/// `output_dir`, creating the directory if needed.
pub fn write_tree<T: Serialize>(
    tree: &T,
    output_dir: &Path,
    prefix: &str,
    folder_name: &str,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let file_name = format!("{}-{}-{}.json", prefix, safe_file_name(folder_name), timestamp);
    let path = output_dir.join(file_name);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let json = serde_json::to_string_pretty(tree).context("failed to serialize tree")?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), "Wrote export file");
    Ok(path)
}

fn safe_file_name(name: &str) -> String {
    name.replace('/', "-").replace('\\', "-").replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn file_entry(name: &str) -> ScannedEntry {
        ScannedEntry {
            name: name.to_string(),
            path: format!("/data/{}", name),
            is_dir: false,
            extension: ".txt".to_string(),
            size: 10,
            modified: None,
            created: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_node_id_shape() {
        let id = generate_node_id();
        assert!(id.starts_with("n_"));
        assert_eq!(id.len(), 10);
        assert_ne!(generate_node_id(), generate_node_id());
    }

    #[test]
    fn test_chunk_naming() {
        let chunks = vec![Chunk::new("one".to_string()), Chunk::new("two".to_string())];
        let nodes = chunk_nodes(&chunks, "notes.txt", "/data/notes.txt");
        assert_eq!(nodes[0].name, "Chunk 1");
        assert_eq!(nodes[1].name, "Chunk 2");

        let single = chunk_nodes(&chunks[..1], "notes.txt", "/data/notes.txt");
        assert_eq!(single[0].name, "notes.txt");
    }

    #[test]
    fn test_single_chunk_document_embeds_text() {
        let entry = file_entry("a.txt");
        let node = document_node(&entry, vec![Chunk::new("short text".to_string())]);

        assert_eq!(node.description.as_deref(), Some("short text"));
        assert!(node.items.is_none());
        let meta = node.rag.chunk.unwrap();
        assert_eq!(meta.char_count, 10);
    }

    #[test]
    fn test_multi_chunk_document_gets_items() {
        let entry = file_entry("a.txt");
        let chunks = vec![Chunk::new("one".to_string()), Chunk::new("two".to_string())];
        let node = document_node(&entry, chunks);

        assert!(node.description.is_none());
        assert!(node.rag.chunk.is_none());
        let items = node.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "one");
    }

    #[test]
    fn test_document_node_wire_shape() {
        let entry = file_entry("a.txt");
        let node = document_node(&entry, vec![Chunk::new("text".to_string())]);
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["type"], "item");
        assert_eq!(value["external"]["type"], "local:file");
        assert_eq!(value["external"]["id"], "/data/a.txt");
        assert_eq!(value["_rag"]["source"]["type"], "local-file");
        assert_eq!(value["_rag"]["source"]["fileType"], "Text");
        assert_eq!(value["fileUrl"], "file:///data/a.txt");
    }

    #[test]
    fn test_knowledge_root_shape() {
        let source =
            SyncSource::knowledge_base("/data/notes".to_string(), "notes".to_string(), 10, 1500);
        let root = knowledge_root("notes", source, ExportStats::default(), Vec::new());
        let value = serde_json::to_value(&root).unwrap();

        assert_eq!(value["id"], "kb-local");
        assert_eq!(value["name"], "📚 notes Knowledge Base");
        assert_eq!(value["pattern"]["key"], "knowledge-base");
        assert_eq!(value["_rag"]["stats"]["filesProcessed"], 0);
    }

    #[test]
    fn test_filesystem_root_wraps_children_in_phase() {
        let source = SyncSource::filesystem("/data/notes".to_string(), "notes".to_string(), 5, false);
        let root = filesystem_root("/data/notes", "notes", source, Vec::new());

        assert_eq!(root.children.len(), 1);
        let phase = &root.children[0];
        assert_eq!(phase.id, "/data/notes");
        assert_eq!(phase.name, "📁 notes");
        assert!(phase.expanded);
        assert_eq!(root.pattern.key, "filesystem");
    }

    #[test]
    fn test_file_node_content_populates_rag() {
        let entry = file_entry("a.txt");
        let node = file_node(&entry, Some("café content".to_string()), None);

        assert_eq!(node.description.as_deref(), Some("café content"));
        let rag = node.rag.unwrap();
        assert_eq!(rag.source, "a.txt");
        assert_eq!(rag.source_type, "local-file");
        assert_eq!(rag.char_count, 12);
        assert!(node.expanded.is_none());
    }

    #[test]
    fn test_folder_file_node_starts_collapsed() {
        let entry = ScannedEntry {
            name: "sub".to_string(),
            path: "/data/sub".to_string(),
            is_dir: true,
            extension: String::new(),
            size: 0,
            modified: None,
            created: None,
            children: Vec::new(),
        };
        let node = file_node(&entry, None, Some(Vec::new()));

        assert!(node.is_folder);
        assert_eq!(node.expanded, Some(false));
        assert_eq!(node.file_extension, "");
    }

    #[test]
    fn test_write_tree_names_and_content() {
        let dir = TempDir::new().unwrap();
        let source =
            SyncSource::knowledge_base("/data/my notes".to_string(), "my notes".to_string(), 10, 1500);
        let root = knowledge_root("my notes", source, ExportStats::default(), Vec::new());

        let path = write_tree(&root, dir.path(), "local-content", "my notes").unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("local-content-my-notes-"));
        assert!(file_name.ends_with(".json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["id"], "kb-local");
    }
}
