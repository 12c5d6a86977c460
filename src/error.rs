//! Error types shared by the remote write registry and the status API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::dashboard::envelope::ApiResponse;

/// The queue registry itself could not be consulted. Fatal for a status request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("remote write registry unavailable: {0}")]
    Unavailable(String),
}

/// A single queue could not be read. Downgraded to a warning by the aggregator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueReadError {
    #[error("queue has been stopped")]
    Closed,

    #[error("failed to read {field}: {reason}")]
    Unavailable { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("remote write queue '{name}' not found")]
    NotFound { name: String },

    #[error("remote write queue '{name}': {source}")]
    QueueRead {
        name: String,
        #[source]
        source: QueueReadError,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Retrieval(_) | ApiError::QueueRead { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Value of the envelope's `errorType` field.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::Retrieval(_) | ApiError::QueueRead { .. } => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Retrieval(_) | ApiError::QueueRead { .. } => {
                tracing::error!("Status request failed: {}", self);
            }
            ApiError::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = ApiResponse::<()>::error(self.error_type(), self.to_string());
        (status, axum::Json(body)).into_response()
    }
}
