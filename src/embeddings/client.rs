//! Embedding API clients for various providers

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Embedder;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::AskRagError;
use crate::errors::Result;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// `OpenAI` embeddings API
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AskRagError::Http(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint,
            api_key,
            client,
        })
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let embedding_config = EmbeddingConfig::from_app_config(config);
        Self::new(
            embedding_config.provider,
            embedding_config.model,
            embedding_config.endpoint,
            embedding_config.api_key,
        )
    }

    /// Generate embeddings for multiple texts in one batched call
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, missing embeddings)
    /// - Provider-specific errors (rate limits, quota exceeded, invalid model)
    async fn generate_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        match self.provider {
            EmbeddingProvider::OpenAI => self.generate_batch_openai(texts).await,
            EmbeddingProvider::Ollama => {
                // Ollama doesn't support batch, so we do it with bounded concurrency
                use futures::stream::StreamExt;
                use futures::stream::{
                    self,
                };

                let concurrency = std::cmp::min(texts.len(), 16);
                let futures: Vec<_> = texts
                    .iter()
                    .copied()
                    .map(|text| self.generate_ollama(text))
                    .collect();
                let results: Vec<Result<Vec<f32>>> = stream::iter(futures)
                    .buffered(concurrency)
                    .collect()
                    .await;

                // Convert Vec<Result<T, E>> to Result<Vec<T>, E>
                let mut embeddings = Vec::with_capacity(results.len());
                for result in results {
                    embeddings.push(result?);
                }

                Ok(embeddings)
            }
        }
    }

    /// Generate embeddings in batch using `OpenAI` API
    async fn generate_batch_openai(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AskRagError::Config("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct OpenAIBatchRequest<'a> {
            input: &'a [&'a str],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI batch embeddings API: {} items", texts.len());

        let request = OpenAIBatchRequest {
            input: texts,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AskRagError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AskRagError::Embedding(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AskRagError::Embedding(format!("Failed to parse response: {e}")))?;

        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AskRagError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AskRagError::Embedding(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AskRagError::Embedding(format!("Failed to parse response: {e}")))?;

        Ok(result.embedding)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    /// Generate one embedding per input text, preserving input order.
    /// Oversized batches are split transparently.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if texts.len() <= MAX_BATCH_SIZE {
            return self.generate_batch(texts).await;
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            let embeddings = self.generate_batch(batch).await?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }
}
