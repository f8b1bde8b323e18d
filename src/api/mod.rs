mod handlers;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use crate::llm::{parse::ParseError, CompletionBackend, LlmError};

/// Shared handler state: the note store plus the completion backend.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub llm: Arc<dyn CompletionBackend>,
}

/// Errors a handler can classify. Anything else is a storage failure and
/// surfaces as a 500.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing client input.
    #[error("{0}")]
    Validation(String),

    /// The referenced note does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The completion service failed (transport, auth, quota, timeout).
    #[error(transparent)]
    Upstream(#[from] LlmError),

    /// The completion succeeded but its output was not a structured note.
    #[error("Failed to generate note: {0}")]
    Generation(#[from] ParseError),

    /// Persistence-layer failure.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Generation(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn create_router(db: Database, llm: Arc<dyn CompletionBackend>) -> Router {
    let state = AppState { db, llm };

    Router::new()
        .route("/notes", get(handlers::list_notes))
        .route("/notes", post(handlers::create_note))
        .route("/notes/search", get(handlers::search_notes))
        .route("/notes/generate", post(handlers::generate_note))
        .route("/notes/{id}", get(handlers::get_note))
        .route("/notes/{id}", put(handlers::update_note))
        .route("/notes/{id}", delete(handlers::delete_note))
        .route("/notes/{id}/translate", post(handlers::translate_note))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
