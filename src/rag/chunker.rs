//! Deterministic document chunking
//!
//! Splits a raw text blob into overlapping windows of bounded size. Splitting
//! is hierarchical: paragraph breaks are tried first, then line breaks, then
//! sentence stops, then words, and finally raw character boundaries, so that
//! windows avoid cutting semantic units when the text allows it.

use std::collections::VecDeque;

use tracing::debug;

use crate::errors::AskRagError;
use crate::errors::Result;

const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Separator hierarchy, coarsest first. Segments that none of these can
/// shrink below the size limit are cut at raw character boundaries.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// A contiguous piece of the source document.
///
/// `index` is the chunk's position in the sequence produced by the chunker and
/// stays aligned with the embedding batch. `offset` is the byte position of
/// the chunk in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub offset: usize,
    pub text: String,
}

/// Splits text into overlapping chunks of at most `chunk_size` characters.
///
/// Every character of the input is covered by at least one chunk and
/// consecutive chunks share up to `overlap` characters.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker.
    /// Errors if `overlap` is not less than `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AskRagError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(AskRagError::Config(
                "overlap must be less than chunk size".to_string(),
            ));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split `text` into ordered, overlapping chunks.
    ///
    /// Empty input yields no chunks; input of at most `chunk_size` characters
    /// yields exactly one chunk containing the whole text.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        if char_len(text) <= self.chunk_size {
            return vec![Chunk {
                index: 0,
                offset: 0,
                text: text.to_string(),
            }];
        }

        let mut segments = Vec::new();
        self.split_segments(text, 0, &mut segments);

        // Segments are contiguous, so byte offsets accumulate directly
        let mut offsets = Vec::with_capacity(segments.len());
        let mut pos = 0;
        for seg in &segments {
            offsets.push(pos);
            pos += seg.len();
        }

        let chunks = self.merge_segments(text, &segments, &offsets);

        debug!(
            "Chunked {} chunks from {} segments ({} bytes)",
            chunks.len(),
            segments.len(),
            text.len()
        );

        chunks
    }

    /// Recursively split `text` into contiguous segments of at most
    /// `chunk_size` characters, trying the coarsest separator first.
    fn split_segments<'a>(&self, text: &'a str, level: usize, out: &mut Vec<&'a str>) {
        if text.is_empty() {
            return;
        }

        if char_len(text) <= self.chunk_size {
            out.push(text);
            return;
        }

        let Some(separator) = SEPARATORS.get(level) else {
            self.split_chars(text, out);
            return;
        };

        if !text.contains(separator) {
            self.split_segments(text, level + 1, out);
            return;
        }

        // Keep the separator attached so concatenating segments reconstructs
        // the input exactly
        for piece in text.split_inclusive(separator) {
            if char_len(piece) <= self.chunk_size {
                out.push(piece);
            } else {
                self.split_segments(piece, level + 1, out);
            }
        }
    }

    /// Character-level fallback for runs no separator can break up. Pieces
    /// are sized to the overlap so the merge step can carry a full overlap
    /// across windows.
    fn split_chars<'a>(&self, text: &'a str, out: &mut Vec<&'a str>) {
        let piece_size = if self.overlap > 0 {
            self.overlap
        } else {
            self.chunk_size
        };

        let mut start = 0;
        let mut count = 0;
        for (idx, _) in text.char_indices() {
            if count == piece_size {
                out.push(&text[start..idx]);
                start = idx;
                count = 0;
            }
            count += 1;
        }
        if start < text.len() {
            out.push(&text[start..]);
        }
    }

    /// Concatenate segments back together into windows of at most
    /// `chunk_size` characters, carrying at most `overlap` characters of
    /// trailing segments into the next window.
    fn merge_segments(&self, text: &str, segments: &[&str], offsets: &[usize]) -> Vec<Chunk> {
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut window: VecDeque<usize> = VecDeque::new();
        let mut window_chars = 0;

        for (i, seg) in segments.iter().enumerate() {
            let seg_chars = char_len(seg);

            if window_chars + seg_chars > self.chunk_size && !window.is_empty() {
                Self::emit_window(text, segments, offsets, &window, &mut chunks);

                while !window.is_empty()
                    && (window_chars > self.overlap
                        || window_chars + seg_chars > self.chunk_size)
                {
                    if let Some(front) = window.pop_front() {
                        window_chars -= char_len(segments[front]);
                    }
                }
            }

            window.push_back(i);
            window_chars += seg_chars;
        }

        if !window.is_empty() {
            Self::emit_window(text, segments, offsets, &window, &mut chunks);
        }

        chunks
    }

    fn emit_window(
        text: &str,
        segments: &[&str],
        offsets: &[usize],
        window: &VecDeque<usize>,
        chunks: &mut Vec<Chunk>,
    ) {
        let (Some(&first), Some(&last)) = (window.front(), window.back()) else {
            return;
        };

        let start = offsets[first];
        let end = offsets[last] + segments[last].len();

        chunks.push(Chunk {
            index: chunks.len(),
            offset: start,
            text: text[start..end].to_string(),
        });
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
            .expect("overlap is greater than chunk size")
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
