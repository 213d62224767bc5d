use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::ApiResponse;
use crate::services::IdentityError;

/// Failure of an API handler. Server-side details are logged, not returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database: {0}")]
    Database(String),

    #[error("{0}")]
    Validation(String),

    #[error("internal: {0}")]
    Internal(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Text sent to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) => "A database error occurred".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(ApiResponse::<()>::error(self.public_message()))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected(errors) => Self::Validation(errors.join(", ")),
            IdentityError::Database(msg) => Self::Database(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}
