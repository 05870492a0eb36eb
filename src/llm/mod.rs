//! Answer generation module
//!
//! Thin clients over OpenAI-compatible chat completion APIs and Ollama,
//! invoked once per request with the composed prompt and a low temperature
//! for near-deterministic output.

pub mod client;

pub use client::LlmClient;
pub use client::LlmProvider;

use async_trait::async_trait;

use crate::errors::Result;

/// The generation capability consumed by the retrieval pipeline.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}
