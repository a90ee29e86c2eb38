//! Text chunking for RAG ingestion.
//!
//! Splits extracted document text into retrieval-sized chunks, preferring
//! paragraph boundaries, then sentence boundaries, then hard character
//! windows as a last resort. All sizes are measured in Unicode characters,
//! not bytes, so multi-byte text packs the same as ASCII.

use regex::Regex;

use crate::types::Chunk;

/// Paragraph-preferring text chunker.
///
/// Packing is greedy: units are appended to a buffer while the buffer plus
/// the unit plus its join separator stays within the chunk size, and the
/// buffer is flushed as a chunk the moment the next unit would overflow it.
/// A buffer survives across levels, so the tail sentences of an oversized
/// paragraph keep accumulating into the paragraphs that follow.
pub struct TextChunker {
    /// Matches runs of three or more newlines
    blank_runs: Regex,
    /// Matches sentence-ending punctuation followed by whitespace
    sentence_breaks: Regex,
}

impl TextChunker {
    /// Create a new text chunker.
    pub fn new() -> Self {
        Self {
            blank_runs: Regex::new(r"\n{3,}").unwrap(),
            sentence_breaks: Regex::new(r"[.!?]\s+").unwrap(),
        }
    }

    /// Split `text` into chunks of at most `chunk_size` characters.
    ///
    /// Empty and whitespace-only input yields no chunks. Text that fits the
    /// bound after normalization comes back as a single chunk. Sizes below
    /// one are treated as one.
    pub fn chunk(&self, text: &str, chunk_size: usize) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chunk_size = chunk_size.max(1);
        let text = self.normalize(text);

        if char_len(&text) <= chunk_size {
            return vec![Chunk::new(text)];
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for para in text.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            let para_chars = char_len(para);

            // Would this paragraph overflow the buffer (with its "\n\n" join)?
            if char_len(&current) + para_chars + 2 > chunk_size {
                if !current.is_empty() {
                    flush(&mut chunks, &mut current);
                }

                if para_chars > chunk_size {
                    // Paragraph alone is too big: fall back to sentences.
                    for sentence in self.split_sentences(para) {
                        let sentence_chars = char_len(sentence);

                        if char_len(&current) + sentence_chars + 1 > chunk_size {
                            if !current.is_empty() {
                                flush(&mut chunks, &mut current);
                            }
                            if sentence_chars > chunk_size {
                                // Sentence alone is too big: hard windows.
                                for window in char_windows(sentence, chunk_size) {
                                    let window = window.trim();
                                    if !window.is_empty() {
                                        chunks.push(Chunk::new(window.to_string()));
                                    }
                                }
                            } else {
                                current = sentence.to_string();
                            }
                        } else if current.is_empty() {
                            current = sentence.to_string();
                        } else {
                            current.push(' ');
                            current.push_str(sentence);
                        }
                    }
                } else {
                    current = para.to_string();
                }
            } else if current.is_empty() {
                current = para.to_string();
            } else {
                current.push_str("\n\n");
                current.push_str(para);
            }
        }

        flush(&mut chunks, &mut current);

        chunks
    }

    /// Trim the text and collapse runs of blank lines to paragraph breaks.
    fn normalize(&self, text: &str) -> String {
        self.blank_runs.replace_all(text.trim(), "\n\n").into_owned()
    }

    /// Split a paragraph at sentence boundaries.
    ///
    /// A boundary is sentence-ending punctuation followed by whitespace; the
    /// punctuation stays with the preceding sentence and the whitespace is
    /// dropped. The heuristic is deliberately naive: abbreviations like
    /// "Dr. Smith" split too.
    fn split_sentences<'a>(&self, para: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for m in self.sentence_breaks.find_iter(para) {
            // The punctuation char is ASCII, so +1 lands on the next boundary.
            let split_at = m.start() + 1;
            sentences.push(&para[start..split_at]);
            start = m.end();
        }
        sentences.push(&para[start..]);

        sentences
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into chunks using a shared default chunker.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<Chunk> {
    lazy_static::lazy_static! {
        static ref CHUNKER: TextChunker = TextChunker::new();
    }
    CHUNKER.chunk(text, chunk_size)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Append the trimmed buffer as a chunk and clear it.
fn flush(chunks: &mut Vec<Chunk>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(Chunk::new(trimmed.to_string()));
    }
    current.clear();
}

/// Fixed windows of `size` characters; the final window takes the remainder.
fn char_windows(s: &str, size: usize) -> Vec<&str> {
    let mut windows = Vec::new();
    let mut rest = s;

    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(size)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(split);
        windows.push(head);
        rest = tail;
    }

    windows
}
