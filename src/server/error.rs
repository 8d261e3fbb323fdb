//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::family::FamilyError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn unauthorized(error: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error, message)
    }
}

impl From<FamilyError> for ApiError {
    fn from(err: FamilyError) -> Self {
        match &err {
            FamilyError::Validation(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            FamilyError::NotFound => Self::new(StatusCode::NOT_FOUND, "not_found", err.to_string()),
            FamilyError::InvalidCredentials => {
                Self::unauthorized("invalid_credentials", err.to_string())
            }
            FamilyError::CodeSpaceExhausted { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "code_space_exhausted",
                "No family codes are available right now, please try again later",
            ),
            // Store and hasher details stay in the logs
            FamilyError::Persistence(_) => {
                tracing::error!("{}", err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "persistence_error",
                    "Failed to save family group",
                )
            }
            FamilyError::Hashing(_) => {
                tracing::error!("{}", err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.error,
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::StoreError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (FamilyError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (FamilyError::NotFound, StatusCode::NOT_FOUND),
            (FamilyError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                FamilyError::CodeSpaceExhausted { attempts: 50 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                FamilyError::Persistence(StoreError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                FamilyError::Hashing("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_persistence_details_hidden() {
        let err = ApiError::from(FamilyError::Persistence(StoreError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        assert_eq!(err.error, "persistence_error");
        assert!(!err.message.contains("pool"));
    }
}
