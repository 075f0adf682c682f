use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::AnalyzeResponse,
    services::analysis,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub movie_title: String,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Find stored movies similar to `movie_title`, each with a short justification
pub async fn analyze(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let Query(params) = query?;
    tracing::info!(
        request_id = %request_id,
        movie_title = %params.movie_title,
        "Processing analyze request"
    );

    let response = analysis::analyze_movie(&state.services, &params.movie_title).await?;

    tracing::info!(
        request_id = %request_id,
        similar = response.similar_movies.len(),
        "Analyze request completed"
    );

    Ok(Json(response))
}
