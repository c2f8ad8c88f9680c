//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": {"code", "message"}}`.
//! Forbidden-class errors are 403, not-found errors 404, other rule
//! violations and malformed input 400. Database failures become a generic
//! 500 and their detail only reaches the logs.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::ValidationError;
use crate::domains::disputes::DisputeError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "DISPUTE_CLOSED").
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dispute(#[from] DisputeError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Dispute(err) => {
                let status = match err {
                    DisputeError::Forbidden(_) => StatusCode::FORBIDDEN,
                    DisputeError::FineNotFound | DisputeError::DisputeNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    DisputeError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    DisputeError::AlreadyDisputed
                    | DisputeError::DisputesDisabled
                    | DisputeError::DisputeClosed
                    | DisputeError::AlreadyVoted => StatusCode::BAD_REQUEST,
                };
                (status, err.code())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationError::Body(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(ValidationError::Body(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Dispute(err) if err.is_infrastructure() => {
                tracing::error!(error = %err, "Dispute request failed");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
