//! API error types and their HTTP mapping.
//!
//! Every error leaving a handler becomes `{ "error": { "code", "message" } }`
//! with a status code chosen by category:
//!
//! - validation failures        → 400
//! - unknown product/sale       → 404
//! - insufficient stock         → 409 (a conflict with current stock state)
//! - everything infrastructural → 500, with the detail kept in the log

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use kirana_core::CoreError;
use kirana_db::{DbError, SaleTxError};

/// Machine-readable error category for API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    ProductNotFound,
    SaleNotFound,
    InsufficientStock,
    Conflict,
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::ProductNotFound | ErrorCode::SaleNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// An error response as seen by API clients.
#[derive(Debug)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn sale_not_found(id: &str) -> Self {
        ApiError::new(ErrorCode::SaleNotFound, format!("Sale not found: {id}"))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: ErrorCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(code = ?self.code, message = %self.message, "Internal error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                // Internal details stay in the log
                message: if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "Internal server error".to_string()
                } else {
                    self.message
                },
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CoreError::SaleNotFound(_) => ErrorCode::SaleNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::Validation(_) => ErrorCode::ValidationFailed,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::SaleNotFound, err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            _ => ApiError::new(ErrorCode::Internal, err.to_string()),
        }
    }
}

impl From<SaleTxError> for ApiError {
    fn from(err: SaleTxError) -> Self {
        match err {
            SaleTxError::Domain(core) => core.into(),
            SaleTxError::Db(db) => db.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::ValidationFailed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ProductNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InsufficientStock.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let err: ApiError = CoreError::InsufficientStock {
            name: "Galaxy M34".to_string(),
            available: 5,
            requested: 6,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("available 5"));
    }

    #[test]
    fn test_db_internal_errors_collapse() {
        let err: ApiError = DbError::QueryFailed("boom".to_string()).into();
        assert_eq!(err.code, ErrorCode::Internal);
    }
}
