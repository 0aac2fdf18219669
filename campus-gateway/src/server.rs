use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use campus_core::{ChatRequest, ChatResponse, ConfigError};
use campus_knowledge::KnowledgeError;

use crate::content::ContentError;
use crate::deterministic_messages::http;
use crate::pipeline::PipelineError;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_enabled: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct QuickQuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CampusInfoResponse {
    pub name: String,
    pub campuses: Vec<String>,
    pub total_students: String,
    pub founded: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct QuickResponseResponse {
    pub topic: String,
    pub response: String,
}

/// Errors that stop the gateway from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),
    #[error("prompt content error: {0}")]
    Content(#[from] ContentError),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the HTTP server
pub async fn run(state: Arc<AppState>, bind_addr: &str) -> Result<(), ServerError> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/quick-questions", get(quick_questions_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/campus-info", get(campus_info_handler))
        .route("/api/quick-responses/{topic}", get(quick_response_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_enabled: state.pipeline.model_enabled(),
    })
}

/// Chat handler - POST /api/chat
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match state.pipeline.respond(&request).await {
        Ok(answer) => {
            info!(
                source = ?answer.source,
                fragments = answer.fragments.len(),
                "Answered chat request"
            );
            (StatusCode::OK, Json(ChatResponse::new(answer.response))).into_response()
        }
        Err(PipelineError::EmptyMessage) => error_response(StatusCode::BAD_REQUEST, http::EMPTY_MESSAGE),
        Err(PipelineError::InvalidRequest { .. }) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, http::INTERNAL_ERROR)
        }
    }
}

async fn quick_questions_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(QuickQuestionsResponse {
        questions: state.quick_questions.clone(),
    })
}

async fn categories_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let categories = state
        .pipeline
        .store()
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(CategoriesResponse { categories })
}

async fn campus_info_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let campus = &state.campus;
    Json(CampusInfoResponse {
        name: campus.name.clone(),
        campuses: campus.campuses.clone(),
        total_students: campus.total_students.clone(),
        founded: campus.founded.clone(),
        kind: campus.kind.clone(),
    })
}

async fn quick_response_handler(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> impl IntoResponse {
    let response = state.campus.quick_response(&topic).to_string();
    Json(QuickResponseResponse { topic, response })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let error_response = ErrorResponse {
        error: message.to_string(),
    };
    (status, Json(error_response)).into_response()
}
