use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use fts_backend::metrics::Endpoint;
use fts_backend::models::{SearchAllRequest, SearchOneRequest, SearchParams};
use fts_backend::search::SearchOutcome;

use super::{error_response, invalid_input, parse_body, ApiResult};
use crate::state::AppState;

pub async fn search_one(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchOneRequest>, JsonRejection>,
) -> ApiResult {
    state.metrics.record(Endpoint::SearchOne);
    let (document_id, params) = parse_body(payload)?
        .into_params(&state.config.search)
        .map_err(invalid_input)?;

    tracing::info!("Searching document {} for {:?}", document_id, params.query_text);
    let outcome = state
        .engine
        .search_document(&document_id, &params.query_text, params.stop_after_one)
        .await;

    respond(outcome, &params, "searching document in")
}

pub async fn search_all(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchAllRequest>, JsonRejection>,
) -> ApiResult {
    state.metrics.record(Endpoint::SearchAll);
    let params = parse_body(payload)?
        .into_params(&state.config.search)
        .map_err(invalid_input)?;

    tracing::info!("Searching all documents for {:?}", params.query_text);
    let outcome = state
        .engine
        .search_all(&params.query_text, params.stop_after_one)
        .await;

    respond(outcome, &params, "searching documents in")
}

fn respond(outcome: SearchOutcome, params: &SearchParams, action: &str) -> ApiResult {
    if outcome.failed {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error while {} the database", action),
        ));
    }

    let mut results = outcome.matches;
    let total = results.len();
    results.truncate(params.max_results);

    tracing::debug!("Found {} matches, returning {}", total, results.len());
    Ok(Json(json!({
        "results": results,
        "total": total
    })))
}
