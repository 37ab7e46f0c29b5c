pub mod documents;
pub mod search;
pub mod server;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use fts_backend::models::ValidationError;
use fts_backend::storage::StorageError;

use crate::state::AppState;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult = Result<Json<Value>, ApiError>;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({"error": message.into()})))
}

/// Unwrap a JSON body, turning a malformed or incomplete payload into a 400
pub fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            Err(error_response(StatusCode::BAD_REQUEST, "Error while validating input"))
        }
    }
}

pub fn invalid_input(err: ValidationError) -> ApiError {
    tracing::debug!("Rejected request: {}", err);
    error_response(
        StatusCode::BAD_REQUEST,
        format!("Error while validating input: {}", err),
    )
}

/// `action` completes "Error while ... the database"
pub fn storage_failure(err: StorageError, action: &str) -> ApiError {
    match err {
        StorageError::Duplicate(id) => {
            tracing::debug!("Document {} already exists", id);
            error_response(StatusCode::CONFLICT, format!("Document already exists: {}", id))
        }
        other => {
            tracing::error!("Error while {} the database: {}", action, other);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error while {} the database", action),
            )
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/metrics", get(server::metrics))
        .route("/api/documents/add", post(documents::add_document))
        .route("/api/documents/edit", post(documents::edit_document))
        .route("/api/documents/remove", post(documents::remove_document))
        .route("/api/documents/remove_all", post(documents::remove_all_documents))
        .route("/api/search/one", post(search::search_one))
        .route("/api/search/all", post(search::search_all))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
