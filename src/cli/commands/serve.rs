//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for the analysis workflows and the session's
//! analysis log. One server process holds one session; its log lives for
//! the lifetime of the process.

use crate::analysis::AnalysisRecord;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::GranskaError;
use crate::session::AnalysisSession;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    session: AnalysisSession,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let session = AnalysisSession::new(settings)?;

    let state = Arc::new(AppState { session });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/analyze/image", post(analyze_image))
        .route("/analyze/video", post(analyze_video))
        .route("/search", post(search))
        .route("/knowledge", post(knowledge))
        .route("/analyses", get(list_analyses))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Granska API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Analyze Image", "POST /analyze/image");
    Output::kv("Analyze Video", "POST /analyze/video");
    Output::kv("Web Search", "POST /search");
    Output::kv("Knowledge Query", "POST /knowledge");
    Output::kv("Past Analyses", "GET  /analyses");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct UploadRequest {
    /// Base64-encoded file contents
    data: String,
    /// Original file name; the extension selects the media handling
    filename: String,
}

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
}

#[derive(Deserialize)]
struct KnowledgeRequest {
    question: String,
}

#[derive(Serialize)]
struct KnowledgeResponse {
    answer: String,
}

#[derive(Serialize)]
struct AnalysesResponse {
    analyses: Vec<AnalysisRecord>,
    total: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Decode an upload request into bytes plus extension.
fn decode_upload(req: &UploadRequest) -> Result<(Vec<u8>, String), String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.data)
        .map_err(|e| format!("Invalid base64 data: {}", e))?;

    let extension = std::path::Path::new(&req.filename)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| format!("File has no extension: {}", req.filename))?
        .to_string();

    Ok((bytes, extension))
}

fn error_status(e: &GranskaError) -> StatusCode {
    match e {
        GranskaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        GranskaError::NoPastAnalyses => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze_image(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> impl IntoResponse {
    let (bytes, extension) = match decode_upload(&req) {
        Ok(decoded) => decoded,
        Err(error) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
        }
    };

    match state.session.analyze_image(&bytes, &extension).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn analyze_video(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> impl IntoResponse {
    let (bytes, extension) = match decode_upload(&req) {
        Ok(decoded) => decoded,
        Err(error) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
        }
    };

    match state.session.analyze_video(&bytes, &extension).await {
        Ok(analysis) => Json(analysis.record).into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    match state.session.search_and_analyze(&req.query).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn knowledge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KnowledgeRequest>,
) -> impl IntoResponse {
    match state.session.query_knowledge(&req.question).await {
        Ok(answer) => Json(KnowledgeResponse { answer }).into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn list_analyses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let analyses = state.session.records();
    Json(AnalysesResponse {
        total: analyses.len(),
        analyses,
    })
}
