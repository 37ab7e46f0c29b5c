use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use fts_backend::metrics::Endpoint;
use fts_backend::models::{AddDocumentRequest, EditDocumentRequest, RemoveDocumentRequest};

use super::{error_response, invalid_input, parse_body, storage_failure, ApiResult};
use crate::state::AppState;

pub async fn add_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddDocumentRequest>, JsonRejection>,
) -> ApiResult {
    state.metrics.record(Endpoint::Add);
    let document = parse_body(payload)?.into_document().map_err(invalid_input)?;

    tracing::info!("Adding document {} ({})", document.id, document.name);
    state
        .store
        .add_document(document)
        .await
        .map_err(|e| storage_failure(e, "saving document to"))?;

    tracing::debug!("Saved document to the database");
    Ok(Json(json!({"message": "Saved document to the database"})))
}

/// Replace a document's name and text; omitted fields keep their stored value
pub async fn edit_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EditDocumentRequest>, JsonRejection>,
) -> ApiResult {
    state.metrics.record(Endpoint::Edit);
    let req = parse_body(payload)?;
    req.validate().map_err(invalid_input)?;
    let id = req.id.clone();

    tracing::info!("Editing document {}", id);
    let document = match req.into_complete() {
        Ok(document) => document,
        Err(partial) => {
            let existing = state
                .store
                .get_document(&id)
                .await
                .map_err(|e| storage_failure(e, "editing document in"))?;
            match existing {
                Some(existing) => partial.apply_to(existing),
                None => return Err(not_found(&id)),
            }
        }
    };

    let updated = state
        .store
        .update_document(document)
        .await
        .map_err(|e| storage_failure(e, "editing document in"))?;
    if !updated {
        return Err(not_found(&id));
    }

    tracing::debug!("Edited document {}", id);
    Ok(Json(json!({"message": "Edited document in the database"})))
}

pub async fn remove_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RemoveDocumentRequest>, JsonRejection>,
) -> ApiResult {
    state.metrics.record(Endpoint::Remove);
    let req = parse_body(payload)?;

    tracing::info!("Removing document {}", req.id);
    let removed = state
        .store
        .remove_document(&req.id)
        .await
        .map_err(|e| storage_failure(e, "removing document from"))?;

    tracing::debug!("Removed document {} (existed: {})", req.id, removed);
    Ok(Json(json!({
        "message": "Removed document from the database",
        "removed": removed
    })))
}

pub async fn remove_all_documents(State(state): State<Arc<AppState>>) -> ApiResult {
    state.metrics.record(Endpoint::RemoveAll);

    tracing::info!("Removing all documents");
    let removed = state
        .store
        .remove_all()
        .await
        .map_err(|e| storage_failure(e, "removing documents from"))?;

    tracing::debug!("Removed {} documents", removed);
    Ok(Json(json!({
        "message": "Removed all documents from the database",
        "removed": removed
    })))
}

fn not_found(id: &str) -> super::ApiError {
    tracing::debug!("Document {} not found", id);
    error_response(StatusCode::NOT_FOUND, format!("Document not found: {}", id))
}
