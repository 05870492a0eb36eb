//! Embeddings generation module
//!
//! This module provides functionality for generating text embeddings using
//! various providers:
//! - OpenAI (text-embedding-3-small, text-embedding-ada-002, etc.)
//! - Ollama (local models)
//!
//! # Examples
//!
//! ```rust,no_run
//! use askrag::embeddings::{Embedder, EmbeddingClient};
//! use askrag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_config(&config)?;
//!
//!     let vectors = client.embed(&["Hello, world!"]).await?;
//!     println!("Generated embedding with {} dimensions", vectors[0].len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;

use async_trait::async_trait;

use crate::errors::Result;

/// Default embedding dimension for OpenAI text-embedding-3-small
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Maximum batch size per embedding request
pub const MAX_BATCH_SIZE: usize = 100;

/// The embedding capability consumed by the retrieval pipeline.
///
/// Implementations return one vector per input string, in input order, and
/// all vectors produced by one implementation share the same dimensionality.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        // Determine provider based on llm_key or endpoint
        // Priority: llm_key > endpoint domain
        let provider = if config.llm_key() == "ollama" {
            EmbeddingProvider::Ollama
        } else if config.llm_endpoint().contains("api.openai.com") {
            EmbeddingProvider::OpenAI
        } else if config.llm_endpoint().contains("localhost")
            || !config.llm_endpoint().contains("openai")
        {
            // Local or non-OpenAI endpoint, assume Ollama
            EmbeddingProvider::Ollama
        } else {
            EmbeddingProvider::OpenAI
        };

        Self {
            provider,
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            endpoint: config.llm_endpoint().to_string(),
            api_key: if provider == EmbeddingProvider::OpenAI {
                Some(config.llm_key().to_string())
            } else {
                None
            },
        }
    }
}
