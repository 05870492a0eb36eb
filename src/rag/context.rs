//! Context assembly from ranked chunks

use crate::rag::ScoredChunk;

/// Delimiter between chunks in the assembled context. Multi-character and
/// fenced by blank lines so it is not expected to occur in normal text.
pub const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// Assembler for creating the context block from ranked chunks
pub struct ContextAssembler {
    delimiter: String,
}

impl ContextAssembler {
    /// Create a new context assembler with a custom delimiter
    #[must_use]
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    /// Join the chunk texts, in ranked order, into a single context block.
    ///
    /// Chunks overlap in the source text, so the same passage may appear
    /// twice in the output; nothing is deduplicated.
    #[must_use]
    pub fn assemble(&self, results: &[ScoredChunk]) -> String {
        results
            .iter()
            .map(|scored| scored.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.delimiter)
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(CONTEXT_DELIMITER)
    }
}
