//! Export and extraction counters.
//!
//! Both stat blocks are plain values threaded through the pipeline and
//! returned with the export outcome, never shared mutable state.

use serde::{Deserialize, Serialize};

/// Counters for a knowledge-base export, recorded under the root `_rag.stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    /// Files with an extractable extension that the pipeline visited
    pub files_processed: usize,

    /// Files that yielded enough text to keep
    pub files_extracted: usize,

    /// Chunks produced across all extracted files
    pub total_chunks: usize,

    /// Files whose extraction failed outright
    pub errors: usize,
}

/// Counters for content extraction across a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    /// Extraction attempts, including ones that were skipped
    pub attempted: usize,

    /// Files that decoded successfully
    pub succeeded: usize,

    /// Files that could not be read or parsed
    pub failed: usize,

    /// Files outside the extractable set or over the size ceiling
    pub skipped: usize,

    /// Characters extracted in total, after truncation
    pub total_chars: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_stats_wire_names() {
        let stats = ExportStats {
            files_processed: 4,
            files_extracted: 3,
            total_chunks: 11,
            errors: 1,
        };
        let value = serde_json::to_value(stats).unwrap();

        assert_eq!(value["filesProcessed"], 4);
        assert_eq!(value["filesExtracted"], 3);
        assert_eq!(value["totalChunks"], 11);
        assert_eq!(value["errors"], 1);
    }

    #[test]
    fn test_extraction_stats_default_is_zeroed() {
        let stats = ExtractionStats::default();
        assert_eq!(stats.attempted, 0);
        assert_eq!(stats.total_chars, 0);
    }
}
