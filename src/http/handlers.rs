//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{error::QueryError, status::ServerStatus};

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    #[serde(default)]
    pub address: Option<String>,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self {
            error: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// GET /api/server-status?address=...
pub async fn server_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusParams>,
) -> Result<Json<ServerStatus>, ApiError> {
    let address = params
        .address
        .as_deref()
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .ok_or_else(|| ApiError::bad_request("server address must not be empty"))?;

    let status = state.client.query(address).await?;
    Ok(Json(status))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
