//! RAG (Retrieval-Augmented Generation) module
//!
//! This module provides end-to-end RAG functionality for querying pasted text:
//! - Deterministic chunking of the source document
//! - Semantic retrieval using vector embeddings
//! - Exact cosine-similarity ranking
//! - Context assembly from the top-ranked chunks
//! - LLM-based answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use askrag::rag::RagService;
//! use askrag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::new(&config)?;
//!
//!     let document = "The sky is blue. The grass is green.";
//!     let answer = service.answer(document, "What color is the grass?").await?;
//!     println!("Answer: {answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod chunker;
pub mod context;
pub mod pipeline;
pub mod prompts;
pub mod ranker;

pub use chunker::Chunk;
pub use chunker::TextChunker;
pub use context::ContextAssembler;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use ranker::cosine_similarity;
pub use ranker::rank;

/// A chunk paired with its similarity score against the question vector
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}
