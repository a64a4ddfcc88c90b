use crate::state::AppState;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use csm_speech::{GenerationRequest, GenerationResponse, SpeechError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    log::info!("Creating API router with endpoints:");
    log::info!("  GET  /");
    log::info!("  GET  /health");
    log::info!("  POST /generate");

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/generate", post(generate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "CSM Audio Generation API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "generate": "/generate",
            "health": "/health"
        }
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    log::debug!("Health check endpoint called");
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.service.registry().is_loaded(),
    })
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let response = state.service.generate(request).await?;
    Ok(Json(response))
}

/// Transport-level error envelope: `{"detail": ...}` with a status matching
/// the failure class.
pub struct AppError(SpeechError);

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SpeechError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "detail": self.0.to_string()
        }));

        (status, body).into_response()
    }
}
