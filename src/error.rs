use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// ApiError
///
/// Every failure an endpoint can surface. Each variant maps to one status code and is
/// rendered as `{ "error": <message> }`, so the message text is part of the API contract.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Required conversion identifiers are missing or empty.
    #[error("campaignId and clickSessionId are required")]
    Validation,

    /// The request body could not be parsed as JSON.
    #[error("Invalid JSON body")]
    InvalidBody,

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    /// The intake sink refused or failed to take the event.
    #[error("Conversion could not be queued")]
    SinkUnavailable(#[from] SinkError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::SinkUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// ErrorBody
///
/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::SinkUnavailable(source) = &self {
            tracing::error!(error = %source, "intake sink failure");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// SinkError
///
/// Failures raised by an `IntakeSink` implementation.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("sink rejected event: {0}")]
    Rejected(String),
}
