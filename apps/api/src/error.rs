//! # API Error Type
//!
//! What HTTP clients see when a request fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  ├──► ServiceError ──► ApiError ──► 4xx │
//! │  sqlx::Error ─────► DbError ─────┘                        │             │
//! │                                                           └──► 500      │
//! │  AuthError (bearer token) ────────────────────────────────► 401         │
//! │  JSON / path / query rejections ──────────────────────────► 400         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database details are logged and replaced by a generic message; they
//! never reach the response body.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockroom_core::CoreError;
use stockroom_db::DbError;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::services::ServiceError;

/// Result alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by every endpoint.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CONFLICT",
///   "message": "There is already a product named 'Desk Lamp'"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A field failed validation, or the body could not be decoded (400)
    ValidationError,

    /// A patch carried no fields (400)
    EmptyInput,

    /// Well-formed request that breaks a business rule (400)
    BusinessRule,

    /// Name, email or username already taken (409)
    Conflict,

    /// Missing, or owned by someone else (404)
    NotFound,

    /// Missing or invalid bearer token (401)
    Unauthorized,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::EmptyInput | ErrorCode::BusinessRule => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Could not validate credentials")
    }

    /// Creates an internal error with a generic message.
    pub fn internal() -> Self {
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::EmptyPatch => ErrorCode::EmptyInput,
            CoreError::BusinessRule(_) => ErrorCode::BusinessRule,
            CoreError::DuplicateName { .. }
            | CoreError::DuplicateEmail
            | CoreError::DuplicateUsername { .. } => ErrorCode::Conflict,
            CoreError::AccessDenied { .. } => ErrorCode::NotFound,
            CoreError::UserNotFound(id) => {
                warn!(user_id = id, "Token subject has no account");
                return ApiError::new(ErrorCode::Unauthorized, "Invalid user");
            }
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, .. } => {
                warn!(%field, "Unmapped unique violation");
                ApiError::new(ErrorCode::Conflict, "Resource already exists")
            }
            other => {
                // Log the actual error but return a generic message
                error!(error = %other, "Database operation failed");
                ApiError::internal()
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Db(e) => e.into(),
            ServiceError::Internal(message) => {
                error!(%message, "Internal service error");
                ApiError::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        warn!(reason = %err, "Rejected request credentials");
        ApiError::unauthorized()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ValidationError;

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (
                CoreError::Validation(ValidationError::required("name")),
                ErrorCode::ValidationError,
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::EmptyPatch, ErrorCode::EmptyInput, StatusCode::BAD_REQUEST),
            (
                CoreError::BusinessRule("nope".to_string()),
                ErrorCode::BusinessRule,
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::DuplicateName {
                    name: "Desk Lamp".to_string(),
                },
                ErrorCode::Conflict,
                StatusCode::CONFLICT,
            ),
            (CoreError::DuplicateEmail, ErrorCode::Conflict, StatusCode::CONFLICT),
            (
                CoreError::AccessDenied { product_id: 7 },
                ErrorCode::NotFound,
                StatusCode::NOT_FOUND,
            ),
            (CoreError::UserNotFound(3), ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (err, code, status) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.code, code);
            assert_eq!(api.code.status(), status);
        }
    }

    #[test]
    fn test_validation_message_is_kept() {
        let api: ApiError = CoreError::Validation(ValidationError::required("price")).into();
        assert_eq!(api.message, "price is required");
    }

    #[test]
    fn test_db_details_are_hidden() {
        let api: ApiError = DbError::QueryFailed("no such table: products".to_string()).into();
        assert_eq!(api.code, ErrorCode::Internal);
        assert!(!api.message.contains("products"));

        let api: ApiError = ServiceError::Internal("join error".to_string()).into();
        assert_eq!(api.code, ErrorCode::Internal);
        assert_eq!(api.message, "Internal server error");
    }

    #[test]
    fn test_serialized_shape() {
        let body = serde_json::to_value(ApiError::new(ErrorCode::EmptyInput, "No data provided"))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "code": "EMPTY_INPUT", "message": "No data provided" })
        );
    }
}
