use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::StoreError;
use crate::models::{InvalidPlayerId, ValidationError};

pub const PLAYER_NOT_FOUND: &str = "Player with specified ID not found!";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is not JSON of the expected shape.
    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    InvalidId(#[from] InvalidPlayerId),

    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn player_not_found() -> Self {
        ApiError::NotFound(PLAYER_NOT_FOUND.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput(_) | ApiError::InvalidId(_) | ApiError::ValidationFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Record server-side failures before they are rendered.
    pub fn log(&self) {
        if let ApiError::Store(err) = self {
            tracing::error!(error = %err, "Player store operation failed");
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedInput(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::MalformedInput(rejection.body_text())
        }
    }
}

/// Error body of the direct response shape
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.log();

        let body = Json(ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
