//! Share API endpoints
//!
//! Provides REST API endpoints for schema sharing:
//! - POST /api/share - Store a schema, returns its short id
//! - GET /api/share - Number of live entries and the capacity
//! - GET /api/share/:id - Fetch a stored schema

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;

use super::protocol::{
    ApiError, CODE_BAD_REQUEST, CODE_CAPACITY_EXCEEDED, CODE_NOT_FOUND, CreateShareResponse,
    ShareStats,
};
use super::store::{ShareStore, ShareStoreError};

/// Share API state containing the share store
#[derive(Clone)]
pub struct ShareApiState {
    pub store: ShareStore,
}

impl ShareApiState {
    pub fn new(store: ShareStore) -> Self {
        Self { store }
    }
}

/// Share API error types
#[derive(Debug, thiserror::Error)]
pub enum ShareApiError {
    #[error("Diagram not found. The link has expired or is invalid.")]
    NotFound,

    #[error("Maximum storage capacity exceeded. Please try again later.")]
    CapacityExceeded,

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<ShareStoreError> for ShareApiError {
    fn from(err: ShareStoreError) -> Self {
        match err {
            ShareStoreError::CapacityExceeded(_) => ShareApiError::CapacityExceeded,
        }
    }
}

impl IntoResponse for ShareApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ShareApiError::NotFound => (StatusCode::NOT_FOUND, CODE_NOT_FOUND),
            ShareApiError::CapacityExceeded => {
                (StatusCode::INSUFFICIENT_STORAGE, CODE_CAPACITY_EXCEEDED)
            }
            ShareApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, CODE_BAD_REQUEST),
        };

        let body = ApiError::new(self.to_string(), code);

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the share API router
pub fn share_router(state: ShareApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/share", get(stats_handler).post(create_share_handler))
        .route("/api/share/{id}", get(get_share_handler))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/share
/// Store a JSON-encoded schema
async fn create_share_handler(
    State(state): State<Arc<ShareApiState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateShareResponse>), ShareApiError> {
    let data: Value = serde_json::from_slice(&body)
        .map_err(|e| ShareApiError::BadRequest(format!("body is not valid JSON: {e}")))?;
    if !data.is_object() {
        return Err(ShareApiError::BadRequest(
            "body must be a JSON object".to_string(),
        ));
    }

    let id = state.store.create(data).map_err(|e| {
        tracing::warn!("Share rejected: {}", e);
        ShareApiError::from(e)
    })?;

    tracing::info!("Share created: {} ({} bytes)", id, body.len());

    Ok((StatusCode::CREATED, Json(CreateShareResponse { id })))
}

/// GET /api/share
async fn stats_handler(State(state): State<Arc<ShareApiState>>) -> Json<ShareStats> {
    Json(ShareStats {
        count: state.store.count(),
        max: state.store.capacity(),
    })
}

/// GET /api/share/:id
async fn get_share_handler(
    State(state): State<Arc<ShareApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ShareApiError> {
    tracing::debug!("Loading shared schema {}", id);

    match state.store.get(&id) {
        Some(data) => Ok(Json(data)),
        None => {
            tracing::info!("Shared schema {} not found", id);
            Err(ShareApiError::NotFound)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
