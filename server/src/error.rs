use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::r2d2::PoolError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Underlying cause, only present for storage failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Storage(#[from] diesel::result::Error),

    #[error("Database connection failed: {0}")]
    Pool(#[from] PoolError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Storage(_) | ServiceError::Pool(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ServiceError::Validation(message)
            | ServiceError::NotFound(message)
            | ServiceError::Conflict(message) => ErrorResponse::new(message),
            ServiceError::Storage(cause) => ErrorResponse {
                error: "Database commit failed".to_string(),
                details: Some(cause.to_string()),
            },
            ServiceError::Pool(cause) => {
                tracing::error!("Failed to get DB connection: {}", cause);
                ErrorResponse::new("Database connection failed")
            }
            ServiceError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                ErrorResponse::new("Internal server error")
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let response = ServiceError::validation("Title is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Title is required"})
        );
    }

    #[tokio::test]
    async fn test_not_found_and_conflict_statuses() {
        let response = ServiceError::not_found("Recipe not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ServiceError::Conflict("User already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_storage_failure_carries_details() {
        let response = ServiceError::Storage(diesel::result::Error::RollbackTransaction)
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Database commit failed");
        assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
    }
}
