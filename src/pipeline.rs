//! Export pipelines.
//!
//! Both pipelines scan the configured folder and write a timestamped JSON
//! tree. The knowledge-base pipeline extracts and chunks document text into
//! retrieval nodes, pruning folders with nothing extractable; the filesystem
//! pipeline mirrors the folder structure entry for entry, optionally
//! inlining extracted content.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::chunker::TextChunker;
use crate::extract::{is_extractable, ContentExtractor};
use crate::scan::{count_entries, FolderScanner, ScannedEntry};
use crate::tree;
use crate::types::{
    ExportConfig, ExportStats, ExtractionStats, FileNode, KnowledgeNode, SyncSource,
};
use crate::MIN_EXTRACT_CHARS;

/// Which export pattern to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPattern {
    /// Chunked document tree for retrieval.
    KnowledgeBase,
    /// Folder structure mirror with optional inline content.
    Filesystem,
}

/// Everything a finished export produces.
#[derive(Debug)]
pub struct ExportOutcome {
    /// Path of the written JSON file.
    pub output_path: PathBuf,
    /// The serialized tree, as written.
    pub tree: Value,
    pub export_stats: ExportStats,
    pub extraction_stats: ExtractionStats,
}

/// Run the export for the given pattern.
pub fn run_export(pattern: ExportPattern, config: &ExportConfig) -> Result<ExportOutcome> {
    match pattern {
        ExportPattern::KnowledgeBase => export_knowledge_base(config),
        ExportPattern::Filesystem => export_filesystem(config),
    }
}

/// Export the configured folder as a knowledge-base tree.
pub fn export_knowledge_base(config: &ExportConfig) -> Result<ExportOutcome> {
    let (folder, folder_name) = resolve_folder(config)?;

    info!(
        folder = %folder.display(),
        chunk_size = config.chunk_size,
        max_depth = config.max_depth,
        "Starting knowledge-base export"
    );

    let entries = FolderScanner::new(config.max_depth).scan(&folder);

    let chunker = TextChunker::new();
    let extractor = ContentExtractor::new(config.max_content_kb);
    let mut export_stats = ExportStats::default();
    let mut extraction_stats = ExtractionStats::default();

    let children = build_knowledge_nodes(
        &entries,
        &chunker,
        &extractor,
        config.chunk_size,
        &mut export_stats,
        &mut extraction_stats,
    );
    export_stats.errors = extraction_stats.failed;

    let source = SyncSource::knowledge_base(
        folder.to_string_lossy().to_string(),
        folder_name.clone(),
        config.max_depth,
        config.chunk_size,
    );
    let root = tree::knowledge_root(&folder_name, source, export_stats, children);
    let output_path = tree::write_tree(&root, &config.output_dir, "local-content", &folder_name)?;

    info!(
        files_processed = export_stats.files_processed,
        files_extracted = export_stats.files_extracted,
        total_chunks = export_stats.total_chunks,
        errors = export_stats.errors,
        "Knowledge-base export finished"
    );

    Ok(ExportOutcome {
        output_path,
        tree: serde_json::to_value(&root)?,
        export_stats,
        extraction_stats,
    })
}

/// Export the configured folder as a filesystem tree.
pub fn export_filesystem(config: &ExportConfig) -> Result<ExportOutcome> {
    let (folder, folder_name) = resolve_folder(config)?;

    info!(
        folder = %folder.display(),
        extract_content = config.extract_content,
        max_depth = config.max_depth,
        "Starting filesystem export"
    );

    let entries = FolderScanner::new(config.max_depth).scan(&folder);
    let total_entries = count_entries(&entries);

    let extractor = config
        .extract_content
        .then(|| ContentExtractor::new(config.max_content_kb));
    let mut extraction_stats = ExtractionStats::default();

    let children = build_file_nodes(&entries, extractor.as_ref(), &mut extraction_stats);

    let folder_str = folder.to_string_lossy().to_string();
    let source = SyncSource::filesystem(
        folder_str.clone(),
        folder_name.clone(),
        config.max_depth,
        config.extract_content,
    );
    let root = tree::filesystem_root(&folder_str, &folder_name, source, children);
    let output_path = tree::write_tree(&root, &config.output_dir, "local-folder", &folder_name)?;

    let export_stats = ExportStats {
        files_processed: extraction_stats.attempted,
        files_extracted: extraction_stats.succeeded,
        total_chunks: 0,
        errors: extraction_stats.failed,
    };

    info!(
        total_entries,
        files_extracted = export_stats.files_extracted,
        "Filesystem export finished"
    );

    Ok(ExportOutcome {
        output_path,
        tree: serde_json::to_value(&root)?,
        export_stats,
        extraction_stats,
    })
}

/// Canonicalize the configured folder and derive its display name.
fn resolve_folder(config: &ExportConfig) -> Result<(PathBuf, String)> {
    let folder = config
        .folder_path
        .canonicalize()
        .with_context(|| format!("folder not found: {}", config.folder_path.display()))?;

    if !folder.is_dir() {
        bail!("not a directory: {}", folder.display());
    }

    let folder_name = folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "folder".to_string());

    Ok((folder, folder_name))
}

fn build_knowledge_nodes(
    entries: &[ScannedEntry],
    chunker: &TextChunker,
    extractor: &ContentExtractor,
    chunk_size: usize,
    export_stats: &mut ExportStats,
    extraction_stats: &mut ExtractionStats,
) -> Vec<KnowledgeNode> {
    let mut children = Vec::new();

    for entry in entries {
        if entry.is_dir {
            let sub = build_knowledge_nodes(
                &entry.children,
                chunker,
                extractor,
                chunk_size,
                export_stats,
                extraction_stats,
            );
            // Folders without extractable content stay out of the tree.
            if !sub.is_empty() {
                children.push(KnowledgeNode::Folder(tree::folder_node(entry, sub)));
            }
        } else if is_extractable(&entry.extension_lower()) {
            export_stats.files_processed += 1;

            match extractor.extract(Path::new(&entry.path), extraction_stats) {
                Ok(text) if text.trim().chars().count() > MIN_EXTRACT_CHARS => {
                    export_stats.files_extracted += 1;
                    let chunks = chunker.chunk(&text, chunk_size);
                    export_stats.total_chunks += chunks.len();
                    debug!(file = %entry.name, chunks = chunks.len(), "Extracted and chunked");
                    children.push(KnowledgeNode::Document(tree::document_node(entry, chunks)));
                }
                Ok(_) => {
                    debug!(file = %entry.name, "Skipping near-empty file");
                }
                Err(e) => {
                    warn!(file = %entry.name, error = %e, "Extraction failed");
                }
            }
        }
    }

    children
}

fn build_file_nodes(
    entries: &[ScannedEntry],
    extractor: Option<&ContentExtractor>,
    stats: &mut ExtractionStats,
) -> Vec<FileNode> {
    let mut nodes = Vec::new();

    for entry in entries {
        if entry.is_dir {
            let children = build_file_nodes(&entry.children, extractor, stats);
            let children = (!children.is_empty()).then_some(children);
            nodes.push(tree::file_node(entry, None, children));
        } else {
            let content = match extractor {
                Some(extractor) if is_extractable(&entry.extension_lower()) => {
                    match extractor.extract(Path::new(&entry.path), stats) {
                        Ok(text) => (!text.is_empty()).then_some(text),
                        Err(e) => {
                            warn!(file = %entry.name, error = %e, "Extraction failed");
                            None
                        }
                    }
                }
                _ => None,
            };
            nodes.push(tree::file_node(entry, content, None));
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn seed_folder() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.txt"),
            "First paragraph about local files and their content.\n\n\
             Second paragraph with more words to cross the length gate.",
        )
        .unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("sub").join("b.md"),
            "# Notes\n\nThis markdown file carries enough text to pass the minimum threshold.",
        )
        .unwrap();
        fs::create_dir(dir.path().join("empty_sub")).unwrap();
        fs::write(dir.path().join("c.xyz"), "binary-ish leftovers").unwrap();
        fs::write(dir.path().join("tiny.txt"), "too small").unwrap();
        dir
    }

    fn config_for(folder: &TempDir, output: &TempDir) -> ExportConfig {
        ExportConfig::default()
            .with_folder(folder.path())
            .with_output_dir(output.path())
    }

    #[test]
    fn test_knowledge_base_export_end_to_end() {
        let folder = seed_folder();
        let output = TempDir::new().unwrap();
        let config = config_for(&folder, &output);

        let outcome = export_knowledge_base(&config).unwrap();

        // a.txt, tiny.txt, and sub/b.md have extractable extensions;
        // tiny.txt is under the near-empty gate, c.xyz is ignored.
        assert_eq!(outcome.export_stats.files_processed, 3);
        assert_eq!(outcome.export_stats.files_extracted, 2);
        assert_eq!(outcome.export_stats.total_chunks, 2);
        assert_eq!(outcome.export_stats.errors, 0);
        assert_eq!(outcome.extraction_stats.attempted, 3);
        assert_eq!(outcome.extraction_stats.succeeded, 3);

        assert!(outcome.output_path.exists());
        let file_name = outcome.output_path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("local-content-"));

        let tree = &outcome.tree;
        assert_eq!(tree["id"], "kb-local");
        assert_eq!(tree["pattern"]["key"], "knowledge-base");
        assert_eq!(tree["_rag"]["stats"]["filesExtracted"], 2);
        assert_eq!(tree["source"]["chunkSize"], 1500);

        // Folders sort before files; the empty folder is pruned.
        let children = tree["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["name"], "sub");
        assert_eq!(children[0]["type"], "phase");
        assert_eq!(children[0]["children"][0]["name"], "b.md");
        assert_eq!(children[1]["name"], "a.txt");
        assert!(children[1]["description"].is_string());
    }

    #[test]
    fn test_knowledge_base_splits_large_files_into_items() {
        let folder = TempDir::new().unwrap();
        let paragraph = "a".repeat(150);
        let text = [paragraph.as_str(), paragraph.as_str(), paragraph.as_str()].join("\n\n");
        fs::write(folder.path().join("big.txt"), text).unwrap();
        let output = TempDir::new().unwrap();
        let config = config_for(&folder, &output).with_chunk_size(200);

        let outcome = export_knowledge_base(&config).unwrap();

        assert_eq!(outcome.export_stats.total_chunks, 3);
        let doc = &outcome.tree["children"][0];
        assert!(doc["description"].is_null());
        let items = doc["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["name"], "Chunk 1");
        assert_eq!(items[0]["external"]["chunkIndex"], 0);
        assert_eq!(items[2]["_rag"]["chunk"]["charCount"], 150);
    }

    #[test]
    fn test_filesystem_export_with_extraction() {
        let folder = seed_folder();
        let output = TempDir::new().unwrap();
        let config = config_for(&folder, &output);

        let outcome = export_filesystem(&config).unwrap();

        let tree = &outcome.tree;
        assert_eq!(tree["id"], "root-local");
        assert_eq!(tree["name"], "💻 My Computer");
        assert_eq!(tree["pattern"]["key"], "filesystem");
        assert_eq!(tree["source"]["contentExtracted"], true);

        let phase = &tree["children"][0];
        assert!(phase["name"].as_str().unwrap().starts_with("📁 "));
        assert_eq!(phase["expanded"], true);

        // Every entry appears, including the empty folder and c.xyz.
        let entries = phase["children"].as_array().unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0]["name"], "empty_sub");
        assert_eq!(entries[0]["expanded"], false);
        assert!(entries[0].get("children").is_none());

        let a_txt = entries
            .iter()
            .find(|e| e["name"] == "a.txt")
            .unwrap();
        assert!(a_txt["description"].is_string());
        assert_eq!(a_txt["_rag"]["sourceType"], "local-file");

        let c_xyz = entries.iter().find(|e| e["name"] == "c.xyz").unwrap();
        assert!(c_xyz.get("description").is_none());

        assert_eq!(outcome.export_stats.files_processed, 3);
        assert_eq!(outcome.export_stats.files_extracted, 3);
        let file_name = outcome.output_path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("local-folder-"));
    }

    #[test]
    fn test_filesystem_export_without_extraction() {
        let folder = seed_folder();
        let output = TempDir::new().unwrap();
        let mut config = config_for(&folder, &output);
        config.extract_content = false;

        let outcome = export_filesystem(&config).unwrap();

        assert_eq!(outcome.extraction_stats.attempted, 0);
        assert_eq!(outcome.export_stats.files_processed, 0);
        assert_eq!(outcome.tree["source"]["contentExtracted"], false);

        let entries = outcome.tree["children"][0]["children"].as_array().unwrap();
        let a_txt = entries.iter().find(|e| e["name"] == "a.txt").unwrap();
        assert!(a_txt.get("description").is_none());
        assert!(a_txt.get("_rag").is_none());
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let output = TempDir::new().unwrap();
        let config = ExportConfig::default()
            .with_folder("/nonexistent/folder/for/sure")
            .with_output_dir(output.path());

        assert!(export_knowledge_base(&config).is_err());
        assert!(export_filesystem(&config).is_err());
    }

    #[test]
    fn test_run_export_dispatches() {
        let folder = seed_folder();
        let output = TempDir::new().unwrap();
        let config = config_for(&folder, &output);

        let kb = run_export(ExportPattern::KnowledgeBase, &config).unwrap();
        assert_eq!(kb.tree["pattern"]["key"], "knowledge-base");

        let fs_outcome = run_export(ExportPattern::Filesystem, &config).unwrap();
        assert_eq!(fs_outcome.tree["pattern"]["key"], "filesystem");
    }
}
