//! API route handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use super::AppState;
use crate::errors::EduBotError;
use crate::rag::RebuildReport;
use crate::tutor::{AskRequest, AskResponse};

/// Error body: `{"detail": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub status: String,
    pub chunks: usize,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Rebuild the retrieval index from the document folder
pub async fn reindex(State(state): State<Arc<AppState>>) -> Result<Json<IndexResponse>, ApiError> {
    let Some(index) = state.index.clone() else {
        return Err(api_error(
            StatusCode::NOT_IMPLEMENTED,
            "RAG not available - embedding model not loaded",
        ));
    };

    let report: RebuildReport = tokio::task::spawn_blocking(move || index.rebuild())
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            error!(error = %e, "Reindex failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(IndexResponse {
        status: "indexed".to_string(),
        chunks: report.chunks,
    }))
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    state.tutor.ask(request).await.map(Json).map_err(|e| match e {
        EduBotError::InvalidRequest(_) => {
            warn!(error = %e, "Rejected question");
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        other => {
            error!(error = %other, "Question failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Model error: {}", other),
            )
        }
    })
}
