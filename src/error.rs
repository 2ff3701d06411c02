//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::repository::RepositoryError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Domain errors map the same whether raised by a handler or on a write
fn domain_parts(err: &DomainError) -> (StatusCode, &'static str, Option<String>) {
    match err {
        DomainError::InvalidAmount(msg) => {
            (StatusCode::BAD_REQUEST, "invalid_amount", Some(msg.clone()))
        }
        DomainError::InvalidDate(msg) => {
            (StatusCode::BAD_REQUEST, "invalid_date", Some(msg.clone()))
        }
        DomainError::NoTrustScore { user_id } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "no_trust_score",
            Some(user_id.to_string()),
        ),
        DomainError::Blacklisted { user_id } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "blacklisted",
            Some(user_id.to_string()),
        ),
        DomainError::LoanLimitExceeded { requested, maximum } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "loan_limit_exceeded",
            Some(format!("requested {}, maximum {}", requested, maximum)),
        ),
        DomainError::LoanNotActive(id) => (
            StatusCode::CONFLICT,
            "loan_not_active",
            Some(id.to_string()),
        ),
    }
}

impl AppError {
    /// HTTP status, machine-readable code and optional details
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            AppError::Domain(domain_err) => domain_parts(domain_err),

            AppError::Repository(repo_err) => match repo_err {
                RepositoryError::Rejected(domain_err) => domain_parts(domain_err),
                RepositoryError::InvalidValue(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_value", Some(msg.clone()))
                }
                RepositoryError::NotFound { id, .. } => {
                    (StatusCode::NOT_FOUND, "not_found", Some(id.to_string()))
                }
                RepositoryError::Duplicate(constraint) => {
                    (StatusCode::CONFLICT, "duplicate", Some(constraint.clone()))
                }
                RepositoryError::MissingReference(constraint) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "missing_reference",
                    Some(constraint.clone()),
                ),
                RepositoryError::Corrupt(msg) => {
                    tracing::error!("Corrupt record: {}", msg);
                    (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_record", None)
                }
                RepositoryError::Database(e) => {
                    tracing::error!("Database error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
                }
            },

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = self.parts();

        // Internal details stay in the logs
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(RepositoryError::not_found("Loan", Uuid::new_v4()));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_maps_to_409() {
        let err = AppError::from(RepositoryError::Duplicate("users_email_key".to_string()));
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_business_rules_map_to_422() {
        let user_id = Uuid::new_v4();
        assert_eq!(
            status_of(DomainError::NoTrustScore { user_id }.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::Blacklisted { user_id }.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::loan_limit_exceeded(dec!(6000), dec!(4000)).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(RepositoryError::MissingReference("loans_user_id_fkey".to_string()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_invalid_amount_maps_to_400() {
        let err = AppError::from(DomainError::InvalidAmount("amount must be greater than zero".to_string()));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::InvalidRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        let (status, code, details) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "database_error");
        assert!(details.is_none());
    }

    #[test]
    fn test_rejected_write_maps_like_domain_error() {
        let err = AppError::from(RepositoryError::from(DomainError::InvalidDate(
            "start date +262142-12-01 is out of range".to_string(),
        )));
        let (status, code, details) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "invalid_date");
        assert!(details.unwrap().contains("+262142-12-01"));
    }

    #[test]
    fn test_oversized_value_maps_to_400() {
        let err = AppError::from(RepositoryError::InvalidValue(
            "value too long for type character varying(50)".to_string(),
        ));
        let (status, code, _) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "invalid_value");
    }
}
