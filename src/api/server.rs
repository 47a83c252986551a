//! HTTP server implementation

use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::corpus::CorpusStore;
use crate::embeddings::EmbeddingService;
use crate::extract::ExtractorConfig;
use crate::index::IndexHolder;
use crate::matching::Ranker;
use crate::Result;

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16) -> Result<()> {
    info!("Starting career guidance API server...");

    // Load the corpus snapshot once at startup
    let store = CorpusStore::from_config(config).await?;
    let snapshot = Arc::new(store.load_snapshot().await?);
    info!("Loaded {} careers from the skills database", snapshot.len());

    // The index artifact and the embedding backend are both optional;
    // without them the ranker serves fallback matches.
    let index = Arc::new(IndexHolder::from_artifact(&config.index.artifact_path));
    let embeddings = match EmbeddingService::new(config) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            warn!("Embedding service unavailable ({e}); semantic matching disabled");
            None
        }
    };

    let ranker = Arc::new(Ranker::new(snapshot.clone(), index.clone(), embeddings));
    let extractor = Arc::new(ExtractorConfig::default());
    let chat = Arc::new(ChatService::new(
        ranker.clone(),
        ExtractorConfig::default(),
    ));

    let state = AppState {
        snapshot,
        index,
        ranker,
        chat,
        extractor,
    };

    let mut app = routes::app_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new()),
    );

    if config.server.enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{addr}");
    info!("Available endpoints:");
    info!("  GET  /health                    - Health check");
    info!("  POST /api/career/matches        - Rank careers for a profile");
    info!("  POST /api/career/analyze        - Single-career fit analysis");
    info!("  POST /chat/start                - Start a guidance conversation");
    info!("  POST /chat/message              - Process a conversation turn");
    info!("  GET  /chat/summary/:session_id  - Session snapshot");
    info!("  POST /chat/reset/:session_id    - Drop a session");
    info!("  GET  /stats                     - Corpus and index statistics");

    axum::serve(listener, app).await?;

    Ok(())
}
