//! End-to-end pipeline tests with deterministic stand-ins for the embedding
//! and generation capabilities. No network access is required.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use askrag::config::AppConfig;
use askrag::config::RetrievalConfig;
use askrag::embeddings::Embedder;
use askrag::llm::Generator;
use askrag::rag::RagService;
use askrag::AskRagError;
use async_trait::async_trait;

/// Vocabulary the stub embedder projects text onto. One dimension per word;
/// the vector counts occurrences, so texts sharing words score high cosine
/// similarity.
const VOCABULARY: [&str; 8] = [
    "sky", "blue", "grass", "green", "color", "water", "fire", "stone",
];

/// Deterministic embedder: counts vocabulary word occurrences.
struct StubEmbedder {
    calls: AtomicUsize,
}

impl StubEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn embed_one(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        VOCABULARY
            .iter()
            .map(|word| lowered.matches(word).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, texts: &[&str]) -> askrag::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }
}

/// Deterministic generator: echoes the full prompt back so tests can inspect
/// what the generation step was given.
struct EchoGenerator {
    calls: AtomicUsize,
}

impl EchoGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str, _temperature: f32) -> askrag::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompt.to_string())
    }
}

/// Generator enforcing the prompt's grounding policy: answers with the
/// fallback sentence unless a question word appears in the context portion
/// of the prompt.
struct PolicyGenerator;

#[async_trait]
impl Generator for PolicyGenerator {
    async fn generate(&self, prompt: &str, _temperature: f32) -> askrag::Result<String> {
        let context = prompt
            .split("Context:")
            .nth(1)
            .and_then(|rest| rest.split("Question:").next())
            .unwrap_or_default()
            .to_lowercase();
        let question = prompt
            .split("Question:")
            .nth(1)
            .and_then(|rest| rest.split("Answer:").next())
            .unwrap_or_default()
            .to_lowercase();

        let grounded = question
            .split_whitespace()
            .filter(|word| word.len() > 3)
            .any(|word| context.contains(word.trim_end_matches('?')));

        if grounded {
            Ok("Answer derived from the context.".to_string())
        } else {
            Ok("I don't know based on the provided text.".to_string())
        }
    }
}

/// A failing embedder for the error-propagation path.
struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[&str]) -> askrag::Result<Vec<Vec<f32>>> {
        Err(AskRagError::Embedding("quota exceeded".to_string()))
    }
}

fn test_config(chunk_size: usize, overlap: usize, top_k: usize) -> AppConfig {
    AppConfig {
        retrieval: RetrievalConfig {
            chunk_size,
            chunk_overlap: overlap,
            top_k,
        },
        ..AppConfig::default()
    }
}

fn service_with(
    config: &AppConfig,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
) -> RagService {
    RagService::from_services(config, embedder, generator).unwrap()
}

#[tokio::test]
async fn grass_question_ranks_grass_sentence_above_sky_sentence() {
    let config = test_config(20, 0, 4);
    let service = service_with(
        &config,
        Arc::new(StubEmbedder::new()),
        Arc::new(EchoGenerator::new()),
    );

    let response = service
        .ask(
            "The sky is blue. The grass is green.",
            "What color is the grass?",
        )
        .await
        .unwrap();

    let grass_pos = response.context.find("The grass is green.").unwrap();
    let sky_pos = response.context.find("The sky is blue.").unwrap();
    assert!(grass_pos < sky_pos, "grass sentence must be ranked first");

    // The echoed prompt confirms the grass sentence reached the generator
    assert!(response.answer.contains("The grass is green."));
    assert_eq!(response.sources[0].chunk.index, 1);
}

#[tokio::test]
async fn empty_document_fails_validation_before_any_external_call() {
    let config = test_config(1000, 200, 4);
    let embedder = Arc::new(StubEmbedder::new());
    let generator = Arc::new(EchoGenerator::new());
    let service = service_with(&config, embedder.clone(), generator.clone());

    let result = service.answer("", "What color is the grass?").await;

    assert!(matches!(result, Err(AskRagError::Validation(_))));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_question_fails_validation() {
    let config = test_config(1000, 200, 4);
    let service = service_with(
        &config,
        Arc::new(StubEmbedder::new()),
        Arc::new(EchoGenerator::new()),
    );

    let result = service.answer("The sky is blue.", "   ").await;
    assert!(matches!(result, Err(AskRagError::Validation(_))));
}

#[tokio::test]
async fn unrelated_question_still_invokes_generation_with_top_chunks() {
    let config = test_config(20, 0, 4);
    let service = service_with(
        &config,
        Arc::new(StubEmbedder::new()),
        Arc::new(PolicyGenerator),
    );

    let response = service
        .ask(
            "The sky is blue. The grass is green.",
            "Who wrote the symphony?",
        )
        .await
        .unwrap();

    // Low scores do not make the ranker fail: the context still carries chunks
    assert!(!response.context.is_empty());
    assert_eq!(response.answer, "I don't know based on the provided text.");
}

#[tokio::test]
async fn fewer_chunks_than_k_returns_all_of_them() {
    let config = test_config(20, 0, 4);
    let service = service_with(
        &config,
        Arc::new(StubEmbedder::new()),
        Arc::new(EchoGenerator::new()),
    );

    let response = service
        .ask(
            "The sky is blue. The grass is green.",
            "What color is the sky?",
        )
        .await
        .unwrap();

    assert_eq!(response.sources.len(), 2);
}

#[tokio::test]
async fn repeated_calls_produce_identical_answers() {
    let config = test_config(25, 5, 2);
    let service = service_with(
        &config,
        Arc::new(StubEmbedder::new()),
        Arc::new(EchoGenerator::new()),
    );

    let document = "The sky is blue. The grass is green. The water is blue. The stone is grey.";
    let question = "What color is the water?";

    let first = service.ask(document, question).await.unwrap();
    let second = service.ask(document, question).await.unwrap();

    assert_eq!(first.answer, second.answer);
    assert_eq!(first.context, second.context);
}

#[tokio::test]
async fn embedding_failure_aborts_the_whole_request() {
    let config = test_config(1000, 200, 4);
    let generator = Arc::new(EchoGenerator::new());
    let service = service_with(&config, Arc::new(FailingEmbedder), generator.clone());

    let result = service
        .answer("The sky is blue.", "What color is the sky?")
        .await;

    assert!(matches!(result, Err(AskRagError::Embedding(_))));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

mod http {
    //! Router-level tests exercising the HTTP boundary without a socket.

    use super::*;
    use askrag::api::routes::api_routes;
    use askrag::api::AppState;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn test_app(embedder: Arc<dyn Embedder>, generator: Arc<dyn Generator>) -> axum::Router {
        let config = test_config(20, 0, 4);
        let state = AppState {
            rag_service: Arc::new(service_with(&config, embedder, generator)),
        };
        api_routes(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ask_returns_answer_for_valid_request() {
        let app = test_app(Arc::new(StubEmbedder::new()), Arc::new(EchoGenerator::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "text": "The sky is blue. The grass is green.",
                    "question": "What color is the grass?"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["answer"].as_str().unwrap().contains("grass"));
    }

    #[tokio::test]
    async fn missing_text_returns_bad_request_with_error_body() {
        let embedder = Arc::new(StubEmbedder::new());
        let app = test_app(embedder.clone(), Arc::new(EchoGenerator::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "question": "What color is the grass?" }).to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing 'text' or 'question'.");
        assert!(body.get("details").is_none());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn internal_failure_returns_server_error_with_generic_details() {
        let app = test_app(Arc::new(FailingEmbedder), Arc::new(EchoGenerator::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "text": "The sky is blue.",
                    "question": "What color is the sky?"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Server error");
        assert_eq!(body["details"], "embedding request failed");
        // Internal detail must not leak to the caller
        assert!(!body.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = test_app(Arc::new(StubEmbedder::new()), Arc::new(EchoGenerator::new()));

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }
}
