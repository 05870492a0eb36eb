//! LLM API clients for answer generation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Generator;
use crate::errors::AskRagError;
use crate::errors::Result;

/// Supported generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// `OpenAI`-compatible chat completions API
    OpenAI,
    /// Ollama local generation
    Ollama,
}

/// Client for generating answers from various providers
pub struct LlmClient {
    provider: LlmProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl LlmClient {
    /// Create a new LLM client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(
        provider: LlmProvider,
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
        // Same provider heuristic as the embedding client: both calls must
        // run against the same endpoint configuration
        let provider = if config.llm_key() == "ollama" {
            LlmProvider::Ollama
        } else if config.llm_endpoint().contains("api.openai.com") {
            LlmProvider::OpenAI
        } else if config.llm_endpoint().contains("localhost")
            || !config.llm_endpoint().contains("openai")
        {
            LlmProvider::Ollama
        } else {
            LlmProvider::OpenAI
        };

        let api_key = if provider == LlmProvider::OpenAI {
            Some(config.llm_key().to_string())
        } else {
            None
        };

        Self::new(
            provider,
            config.llm_model().to_string(),
            config.llm_endpoint().to_string(),
            api_key,
        )
    }

    /// Generate an answer using the `OpenAI` chat completions API
    async fn generate_openai(&self, prompt: &str, temperature: f32) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AskRagError::Config("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatResponseMessage,
        }

        #[derive(Deserialize)]
        struct ChatResponseMessage {
            content: String,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling OpenAI chat completions API: {}", url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
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
            return Err(AskRagError::Generation(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| AskRagError::Generation(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AskRagError::Generation("No choices in response".to_string()))
    }

    /// Generate an answer using the Ollama API
    async fn generate_ollama(&self, prompt: &str, temperature: f32) -> Result<String> {
        #[derive(Serialize)]
        struct OllamaOptions {
            temperature: f32,
        }

        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: OllamaOptions,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            response: String,
        }

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Calling Ollama generate API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions { temperature },
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
            return Err(AskRagError::Generation(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AskRagError::Generation(format!("Failed to parse response: {e}")))?;

        Ok(result.response)
    }
}

#[async_trait]
impl Generator for LlmClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        match self.provider {
            LlmProvider::OpenAI => self.generate_openai(prompt, temperature).await,
            LlmProvider::Ollama => self.generate_ollama(prompt, temperature).await,
        }
    }
}
