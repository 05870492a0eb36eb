//! HTTP server implementation

use std::sync::Arc;

use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::rag::RagService;
use crate::Result;

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("🚀 Starting askrag API server...");

    // Initialize services
    let rag_service = Arc::new(RagService::new(config)?);

    let state = AppState { rag_service };

    // Build routes and middleware layers
    let mut app = routes::api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    // Add CORS if enabled
    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    // Start server
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /ask    - Ask a question about posted text");

    axum::serve(listener, app).await?;

    Ok(())
}
