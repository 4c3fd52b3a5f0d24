use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::validation::ValidationError;

/// Failure of a Task API handler.
///
/// Validation and store failures both answer 500 and carry the underlying
/// text in the `error` field of the body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{message}: {source}")]
    Validation {
        message: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("{message}: {detail}")]
    BadPayload {
        message: &'static str,
        detail: String,
    },

    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{0}")]
    Unauthorized(&'static str),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn store(message: &'static str, source: sqlx::Error) -> Self {
        error!("{}: {}", message, source);
        ApiError::Store { message, source }
    }

    pub fn invalid(message: &'static str, source: ValidationError) -> Self {
        ApiError::Validation { message, source }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::NotFound(message) | ApiError::Unauthorized(message) => ErrorBody {
                message: (*message).to_string(),
                error: None,
            },
            ApiError::Validation { message, source } => ErrorBody {
                message: (*message).to_string(),
                error: Some(source.to_string()),
            },
            ApiError::BadPayload { message, detail } => ErrorBody {
                message: (*message).to_string(),
                error: Some(detail.clone()),
            },
            ApiError::Store { message, source } => ErrorBody {
                message: (*message).to_string(),
                error: Some(source.to_string()),
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation { .. } | ApiError::BadPayload { .. } | ApiError::Store { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_without_detail() {
        let err = ApiError::NotFound("Task not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let body = err.body();
        assert_eq!(body.message, "Task not found");
        assert!(body.error.is_none());
    }

    #[test]
    fn validation_collapses_to_500_with_passthrough_text() {
        let err = ApiError::invalid(
            "Failed to create task",
            ValidationError::new("title", "is required"),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().error.as_deref(), Some("title: is required"));
    }

    #[test]
    fn store_errors_surface_driver_text() {
        let err = ApiError::store("Failed to fetch tags", sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().message, "Failed to fetch tags");
        assert!(err.body().error.is_some());
    }
}
