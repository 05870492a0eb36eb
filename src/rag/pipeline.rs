//! Complete RAG pipeline: Chunk -> Embed -> Rank -> Assemble -> Generate

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::errors::AskRagError;
use crate::errors::Result;
use crate::llm::Generator;
use crate::llm::LlmClient;
use crate::rag::prompts;
use crate::rag::ranker;
use crate::rag::ContextAssembler;
use crate::rag::ScoredChunk;
use crate::rag::TextChunker;

/// Complete RAG service
///
/// Holds no per-request state: every call to [`RagService::answer`] runs the
/// full pipeline over inputs it exclusively owns, so one service instance is
/// safely shared across concurrent requests.
pub struct RagService {
    chunker: TextChunker,
    context_assembler: ContextAssembler,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    top_k: usize,
    temperature: f32,
}

impl RagService {
    /// Create a new RAG service backed by the configured API clients
    ///
    /// # Errors
    /// - Chunker configuration errors (overlap not less than chunk size)
    /// - Embedding/LLM client configuration errors (invalid API keys, endpoints)
    pub fn new(config: &AppConfig) -> Result<Self> {
        let embedder = Arc::new(EmbeddingClient::from_config(config)?);
        let generator = Arc::new(LlmClient::from_config(config)?);
        Self::from_services(config, embedder, generator)
    }

    /// Create from existing embedding and generation services
    pub fn from_services(
        config: &AppConfig,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        let chunker = TextChunker::new(config.chunk_size(), config.chunk_overlap())?;
        let context_assembler = ContextAssembler::default();

        Ok(Self {
            chunker,
            context_assembler,
            embedder,
            generator,
            top_k: config.top_k(),
            temperature: config.temperature(),
        })
    }

    /// Answer a question about a document
    ///
    /// Runs the full retrieval pipeline and returns only the answer text.
    ///
    /// # Errors
    /// - `Validation` when the document or question is empty
    /// - `Embedding` / `Generation` / `Http` when an external call fails
    pub async fn answer(&self, document: &str, question: &str) -> Result<String> {
        self.ask(document, question).await.map(|r| r.answer)
    }

    /// Run the full retrieval pipeline, keeping the retrieved context and
    /// scored chunks alongside the answer
    pub async fn ask(&self, document: &str, question: &str) -> Result<RagResponse> {
        // Fail fast before any external call is made
        if document.trim().is_empty() {
            return Err(AskRagError::Validation(
                "Missing 'text' or 'question'.".to_string(),
            ));
        }
        if question.trim().is_empty() {
            return Err(AskRagError::Validation(
                "Missing 'text' or 'question'.".to_string(),
            ));
        }

        info!("Processing question ({} document bytes)", document.len());

        // Step 1: Chunk the document
        debug!("Step 1: Chunking document");
        let chunks = self.chunker.split(document);
        debug!("Produced {} chunks", chunks.len());

        // Step 2: Embed the chunk batch and the question concurrently.
        // Both calls run against the same model configuration, so the
        // vectors land in the same space.
        debug!("Step 2: Generating embeddings");
        let chunk_texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let (chunk_embeddings, question_embedding) = tokio::try_join!(
            self.embedder.embed(&chunk_texts),
            self.embed_question(question),
        )?;

        if chunk_embeddings.len() != chunks.len() {
            return Err(AskRagError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                chunk_embeddings.len()
            )));
        }

        // Step 3: Rank chunks against the question vector
        debug!("Step 3: Ranking chunks");
        let scored = ranker::rank(&question_embedding, chunks, &chunk_embeddings, self.top_k);

        // Step 4: Assemble context from the top-ranked chunks
        debug!("Step 4: Assembling context");
        let context = self.context_assembler.assemble(&scored);

        // Step 5: Generate the answer
        debug!("Step 5: Generating answer");
        let prompt = prompts::build_answer_prompt(question, &context);
        let answer = self.generator.generate(&prompt, self.temperature).await?;

        info!("Question answered successfully");

        Ok(RagResponse {
            answer,
            context,
            sources: scored,
            question: question.to_string(),
        })
    }

    async fn embed_question(&self, question: &str) -> Result<Vec<f32>> {
        let vectors = self.embedder.embed(&[question]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| AskRagError::Embedding("No embedding for question".to_string()))
    }
}

/// RAG response
#[derive(Debug, Clone)]
pub struct RagResponse {
    pub answer: String,
    pub context: String,
    pub sources: Vec<ScoredChunk>,
    pub question: String,
}

impl RagResponse {
    /// Get a formatted string representation
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Question: {}\n\n", self.question));
        output.push_str(&format!("Answer:\n{}\n\n", self.answer));
        output.push_str(&format!("Sources ({} chunks):\n", self.sources.len()));

        for (idx, source) in self.sources.iter().enumerate() {
            let preview: String = source.chunk.text.chars().take(60).collect();
            output.push_str(&format!(
                "  {}. [chunk {}] score {:.3}: {}\n",
                idx + 1,
                source.chunk.index,
                source.score,
                preview
            ));
        }

        output
    }
}
