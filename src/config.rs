use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Number of chunks selected as context
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub dimension: usize,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub llm_endpoint: String,
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub retrieval: RetrievalConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::AskRagError::Io)?;

        let config: AppConfig =
            toml::from_str(&content).map_err(crate::AskRagError::TomlParsing)?;

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::AskRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get maximum chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.retrieval.chunk_size
    }

    /// Get chunk overlap in characters
    pub fn chunk_overlap(&self) -> usize {
        self.retrieval.chunk_overlap
    }

    /// Get the number of chunks selected as context
    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get generation temperature
    pub fn temperature(&self) -> f32 {
        self.llm.temperature
    }

    /// Get server bind host
    pub fn server_host(&self) -> &str {
        &self.server.host
    }

    /// Get server bind port
    pub fn server_port(&self) -> u16 {
        self.server.port
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            retrieval: RetrievalConfig {
                chunk_size: default_chunk_size(),
                chunk_overlap: default_chunk_overlap(),
                top_k: default_top_k(),
            },
            embeddings: EmbeddingsConfig {
                dimension: 1536,
                model: "text-embedding-3-small".to_string(),
            },
            llm: LlmConfig {
                llm_endpoint: "https://api.openai.com/v1".to_string(),
                llm_key: String::new(),
                llm_model: default_llm_model(),
                temperature: default_temperature(),
            },
            server: ServerConfig::default(),
        }
    }
}
