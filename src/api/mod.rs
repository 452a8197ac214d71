//! REST API endpoints.
//!
//! Axum-based HTTP API for creating, searching, reading and updating players.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::models::InvalidPlayerId;
use crate::storage::StoreError;
use routes::players;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApiError::NotFound(format!("Player not found: {}", id)),
            other => {
                error!("Store error: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<InvalidPlayerId> for ApiError {
    fn from(e: InvalidPlayerId) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Build the player API router.
///
/// `DELETE /player/:id` is only routed when `server.enable_delete` is set.
pub fn build_router(state: AppState) -> Router {
    let mut player_routes = get(players::get_player).put(players::update_player);
    if state.settings.server.enable_delete {
        player_routes = player_routes.delete(players::delete_player);
    }

    Router::new()
        .route("/player", post(players::create_player))
        .route("/players", get(players::list_players))
        .route("/player/:id", player_routes)
        .with_state(state)
}
