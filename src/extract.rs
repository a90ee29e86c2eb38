//! Text extraction from local files.
//!
//! Reads file bytes, decodes them through an encoding ladder, normalizes
//! line endings, and enforces a per-file content budget. Every attempt is
//! recorded into an [`ExtractionStats`] so callers can report what the run
//! touched, kept, and dropped.

use std::fs;
use std::path::Path;
use std::str;

use thiserror::Error;
use tracing::debug;

use crate::types::ExtractionStats;

/// Extensions with extractable text content, with their format labels.
pub const EXTRACTABLE_EXTENSIONS: &[(&str, &str)] = &[
    (".pdf", "PDF"),
    (".docx", "Word Doc"),
    (".txt", "Text"),
    (".md", "Markdown"),
    (".csv", "CSV"),
    (".json", "JSON"),
];

/// Check whether a lowercase dotted extension is in the extractable set.
pub fn is_extractable(extension: &str) -> bool {
    EXTRACTABLE_EXTENSIONS.iter().any(|(ext, _)| *ext == extension)
}

/// Format label for a lowercase dotted extension, if extractable.
pub fn extension_label(extension: &str) -> Option<&'static str> {
    EXTRACTABLE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, label)| *label)
}

/// Errors produced while extracting text from a file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Extension outside the extractable set.
    #[error("unsupported file type: {extension}")]
    Unsupported { extension: String },

    /// Format is recognized but needs a binary parser this build does not carry.
    #[error("{format} extraction is not supported")]
    BinaryFormat { format: &'static str },

    /// Raw file exceeds the size ceiling.
    #[error("file too large ({size_kb}KB)")]
    TooLarge { size_kb: u64 },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts text content from local files within a size budget.
pub struct ContentExtractor {
    max_content_kb: usize,
}

impl ContentExtractor {
    /// Create an extractor with the given per-file content budget in KB.
    pub fn new(max_content_kb: usize) -> Self {
        Self { max_content_kb }
    }

    /// Extract text from `path`, recording the outcome into `stats`.
    ///
    /// Unsupported and oversized files count as skipped; unreadable files
    /// and recognized-but-unparseable formats count as failed. Extracted
    /// text longer than the content budget is cut at the budget with a
    /// truncation marker appended.
    pub fn extract(
        &self,
        path: &Path,
        stats: &mut ExtractionStats,
    ) -> Result<String, ExtractError> {
        stats.attempted += 1;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();

        if !is_extractable(&extension) {
            stats.skipped += 1;
            return Err(ExtractError::Unsupported { extension });
        }

        // Raw-size ceiling is 10x the content budget; a stat failure here
        // falls through to the read, which reports its own error.
        if let Ok(metadata) = fs::metadata(path) {
            let size = metadata.len();
            if size > (self.max_content_kb * 1024 * 10) as u64 {
                stats.skipped += 1;
                return Err(ExtractError::TooLarge {
                    size_kb: size / 1024,
                });
            }
        }

        let text = match extension.as_str() {
            ".pdf" => {
                stats.failed += 1;
                return Err(ExtractError::BinaryFormat { format: "PDF" });
            }
            ".docx" => {
                stats.failed += 1;
                return Err(ExtractError::BinaryFormat { format: "Word" });
            }
            _ => match self.read_text(path) {
                Ok(text) => text,
                Err(e) => {
                    stats.failed += 1;
                    return Err(e);
                }
            },
        };

        let max_chars = self.max_content_kb * 1024;
        let text = if text.chars().count() > max_chars {
            let kept: String = text.chars().take(max_chars).collect();
            format!("{}\n\n[Truncated at {}KB]", kept, self.max_content_kb)
        } else {
            text
        };

        stats.succeeded += 1;
        stats.total_chars += text.chars().count();

        debug!(
            path = %path.display(),
            chars = text.chars().count(),
            "Extracted text content"
        );

        Ok(text)
    }

    /// Read a file as text with encoding fallback and normalized line endings.
    fn read_text(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = fs::read(path)?;
        let (text, encoding) = decode_text(&bytes);

        if encoding != "utf-8" {
            debug!(path = %path.display(), encoding = encoding, "Non-UTF-8 file decoded");
        }

        Ok(normalize_line_endings(&text))
    }
}

/// Decode bytes through the encoding ladder.
///
/// UTF-8 first, then BOM-marked UTF-16 variants, then Latin-1, which
/// always succeeds. Returns the text and the encoding used.
fn decode_text(content: &[u8]) -> (String, &'static str) {
    if let Ok(s) = str::from_utf8(content) {
        return (s.to_string(), "utf-8");
    }

    if content.len() >= 2 && content[0] == 0xFF && content[1] == 0xFE {
        let utf16: Vec<u16> = content[2..]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        if let Ok(s) = String::from_utf16(&utf16) {
            return (s, "utf-16-le");
        }
    }

    if content.len() >= 2 && content[0] == 0xFE && content[1] == 0xFF {
        let utf16: Vec<u16> = content[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        if let Ok(s) = String::from_utf16(&utf16) {
            return (s, "utf-16-be");
        }
    }

    let s: String = content.iter().map(|&b| b as char).collect();
    (s, "latin-1")
}

/// Normalize line endings to Unix-style (LF).
fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_extracts_utf8_text() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "note.txt", "Hello, world!".as_bytes());

        let extractor = ContentExtractor::new(100);
        let mut stats = ExtractionStats::default();
        let text = extractor.extract(&path, &mut stats).unwrap();

        assert_eq!(text, "Hello, world!");
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.total_chars, 13);
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "latin.txt", b"caf\xe9");

        let extractor = ContentExtractor::new(100);
        let mut stats = ExtractionStats::default();
        let text = extractor.extract(&path, &mut stats).unwrap();

        assert_eq!(text, "café");
        assert_eq!(stats.succeeded, 1);
    }

    #[test]
    fn test_utf16_le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wide.txt", &bytes);

        let extractor = ContentExtractor::new(100);
        let mut stats = ExtractionStats::default();
        assert_eq!(extractor.extract(&path, &mut stats).unwrap(), "hi");
    }

    #[test]
    fn test_crlf_normalization() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "dos.txt", b"line1\r\nline2\rline3");

        let extractor = ContentExtractor::new(100);
        let mut stats = ExtractionStats::default();
        let text = extractor.extract(&path, &mut stats).unwrap();

        assert_eq!(text, "line1\nline2\nline3");
    }

    #[test]
    fn test_unsupported_extension_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "image.png", b"not really a png");

        let extractor = ContentExtractor::new(100);
        let mut stats = ExtractionStats::default();
        let err = extractor.extract(&path, &mut stats).unwrap_err();

        assert!(matches!(err, ExtractError::Unsupported { .. }));
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.succeeded, 0);
    }

    #[test]
    fn test_binary_formats_count_as_failed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "report.pdf", b"%PDF-1.4");

        let extractor = ContentExtractor::new(100);
        let mut stats = ExtractionStats::default();
        let err = extractor.extract(&path, &mut stats).unwrap_err();

        assert!(matches!(err, ExtractError::BinaryFormat { format: "PDF" }));
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn test_oversized_file_is_skipped_before_reading() {
        let dir = TempDir::new().unwrap();
        // Budget of 1KB means a 10KB raw ceiling.
        let path = write_file(&dir, "big.txt", &vec![b'a'; 11 * 1024]);

        let extractor = ContentExtractor::new(1);
        let mut stats = ExtractionStats::default();
        let err = extractor.extract(&path, &mut stats).unwrap_err();

        assert!(matches!(err, ExtractError::TooLarge { .. }));
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_truncation_appends_marker() {
        let dir = TempDir::new().unwrap();
        let content = "x".repeat(1024 + 100);
        let path = write_file(&dir, "long.txt", content.as_bytes());

        let extractor = ContentExtractor::new(1);
        let mut stats = ExtractionStats::default();
        let text = extractor.extract(&path, &mut stats).unwrap();

        assert!(text.ends_with("[Truncated at 1KB]"));
        assert!(text.starts_with(&"x".repeat(1024)));
        assert_eq!(stats.total_chars, text.chars().count());
    }

    #[test]
    fn test_missing_file_counts_as_failed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.txt");

        let extractor = ContentExtractor::new(100);
        let mut stats = ExtractionStats::default();
        let err = extractor.extract(&path, &mut stats).unwrap_err();

        assert!(matches!(err, ExtractError::Io(_)));
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_extension_labels() {
        assert_eq!(extension_label(".md"), Some("Markdown"));
        assert_eq!(extension_label(".csv"), Some("CSV"));
        assert_eq!(extension_label(".rs"), None);
        assert!(is_extractable(".txt"));
        assert!(!is_extractable(".png"));
    }
}
