//! Recursive local folder scanning.
//!
//! Walks a directory tree up to a depth cap, collecting per-entry metadata
//! (size, timestamps, extension) and skipping hidden and temp files. Entries
//! come back sorted folders-first, then case-insensitively by name, so
//! exports are stable across runs.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// A file or directory discovered during a folder scan.
#[derive(Debug, Clone)]
pub struct ScannedEntry {
    /// Base name of the entry.
    pub name: String,
    /// Canonical path, falling back to the raw path if resolution fails.
    pub path: String,
    pub is_dir: bool,
    /// Dotted extension with original casing; empty for directories.
    pub extension: String,
    /// Size in bytes; zero for directories.
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    /// Nested entries; always empty for files.
    pub children: Vec<ScannedEntry>,
}

impl ScannedEntry {
    /// Lowercased dotted extension, for matching against the extractable set.
    pub fn extension_lower(&self) -> String {
        self.extension.to_lowercase()
    }

    /// Emoji icon based on directory name or file extension.
    pub fn icon(&self) -> &'static str {
        if self.is_dir {
            let name = self.name.to_lowercase();
            if name.contains("download") {
                "📥"
            } else if name.contains("document") || name.contains("docs") {
                "📄"
            } else if name.contains("picture") || name.contains("photo") || name.contains("image")
            {
                "🖼️"
            } else if name.contains("video") || name.contains("movie") {
                "🎬"
            } else if name.contains("music") || name.contains("audio") {
                "🎵"
            } else {
                "📁"
            }
        } else {
            match self.extension.to_lowercase().as_str() {
                ".pdf" => "📕",
                ".doc" | ".docx" => "📘",
                ".xls" | ".xlsx" => "📗",
                ".csv" => "📊",
                ".ppt" | ".pptx" => "📙",
                ".txt" | ".md" => "📝",
                ".jpg" | ".jpeg" | ".png" => "🖼️",
                ".gif" => "🎨",
                ".mp4" | ".avi" | ".mov" => "🎬",
                ".mp3" | ".wav" | ".flac" => "🎵",
                ".zip" => "🗜️",
                ".rar" | ".7z" => "📦",
                ".html" => "🌐",
                ".css" => "🎨",
                ".js" => "⚡",
                ".py" => "🐍",
                _ => "📄",
            }
        }
    }
}

/// Scans local folders into [`ScannedEntry`] trees.
pub struct FolderScanner {
    max_depth: usize,
}

impl FolderScanner {
    /// Create a scanner that descends at most `max_depth` levels.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Scan `folder` recursively.
    ///
    /// Unreadable directories log a warning and contribute no entries;
    /// the rest of the scan continues.
    pub fn scan(&self, folder: &Path) -> Vec<ScannedEntry> {
        self.scan_at(folder, 0)
    }

    fn scan_at(&self, folder: &Path, depth: usize) -> Vec<ScannedEntry> {
        if depth > self.max_depth {
            warn!(
                folder = %folder.display(),
                max_depth = self.max_depth,
                "Max scan depth reached"
            );
            return Vec::new();
        }

        let read = match fs::read_dir(folder) {
            Ok(read) => read,
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "Cannot read directory");
                return Vec::new();
            }
        };

        let mut paths: Vec<_> = read.filter_map(|entry| entry.ok().map(|e| e.path())).collect();
        paths.sort_by_key(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            (!p.is_dir(), name)
        });

        let mut entries = Vec::new();
        for path in paths {
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => continue,
            };
            // Skip hidden and temp files.
            if name.starts_with('.') || name.starts_with('~') {
                continue;
            }

            let is_dir = path.is_dir();
            let metadata = fs::metadata(&path).ok();
            let size = if is_dir {
                0
            } else {
                metadata.as_ref().map(|m| m.len()).unwrap_or(0)
            };
            let modified = metadata
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from);
            let created = metadata
                .as_ref()
                .and_then(|m| m.created().ok())
                .map(DateTime::<Utc>::from);

            let extension = if is_dir {
                String::new()
            } else {
                path.extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default()
            };

            let canonical = path
                .canonicalize()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|_| path.to_string_lossy().to_string());

            let children = if is_dir {
                self.scan_at(&path, depth + 1)
            } else {
                Vec::new()
            };

            entries.push(ScannedEntry {
                name,
                path: canonical,
                is_dir,
                extension,
                size,
                modified,
                created,
                children,
            });
        }

        debug!(folder = %folder.display(), entries = entries.len(), "Scanned directory");
        entries
    }
}

/// Total number of entries in a scanned tree, including nested ones.
pub fn count_entries(entries: &[ScannedEntry]) -> usize {
    entries
        .iter()
        .map(|e| 1 + count_entries(&e.children))
        .sum()
}
