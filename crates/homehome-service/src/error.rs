//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use homehome_core::{IdError, RewardError};
use homehome_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Not enough coins.
    #[error("insufficient funds: available={available}, required={required}")]
    InsufficientFunds {
        /// Free plus paid coins held.
        available: u64,
        /// Coins needed.
        required: u64,
    },

    /// Replayed idempotency key.
    #[error("duplicate request: {0}")]
    DuplicateRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::InsufficientFunds {
                available,
                required,
            } => (
                StatusCode::CONFLICT,
                "insufficient_funds",
                "Not enough coins".to_string(),
                Some(serde_json::json!({
                    "available": available,
                    "required": required
                })),
            ),
            Self::DuplicateRequest(key) => (
                StatusCode::CONFLICT,
                "duplicate_request",
                format!("Request {key} already processed"),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RewardError> for ApiError {
    fn from(err: RewardError) -> Self {
        match err {
            RewardError::InsufficientFunds {
                available,
                required,
            } => Self::InsufficientFunds {
                available,
                required,
            },
            RewardError::InvalidAmount(_)
            | RewardError::InvalidSource(_)
            | RewardError::InvalidRollCount(_)
            | RewardError::InvalidId(_) => Self::BadRequest(err.to_string()),
            RewardError::ItemNotOwned { .. } => Self::NotFound(err.to_string()),
            RewardError::CatalogEmpty { .. }
            | RewardError::InvalidCatalog(_)
            | RewardError::Configuration(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Reward(reward) => reward.into(),
            StoreError::DuplicateRequest { key } => Self::DuplicateRequest(key),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
