//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Field validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are written for the API client; `ApiError` forwards them as-is
//! except for `UserNotFound`, which becomes a generic 401.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every rejection the mutation protocol can produce. A rejected mutation
/// never leaves a side effect: all of these are raised before any write.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field failed validation. Displays as the field message alone.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The owner already has a product with this name.
    ///
    /// ## When This Occurs
    /// - Creating a product whose name is taken by the same owner
    /// - Renaming a product to a name another of the owner's products uses
    ///
    /// Other owners may freely use the same name.
    #[error("There is already a product named '{name}'")]
    DuplicateName { name: String },

    /// The product does not exist or belongs to someone else.
    ///
    /// The two cases are deliberately indistinguishable so that callers
    /// cannot learn whether another user's product exists.
    #[error("Product {product_id} is not available to this user")]
    AccessDenied { product_id: i64 },

    /// A patch request carried no fields.
    #[error("No data provided")]
    EmptyPatch,

    /// The request is well-formed but violates a business rule.
    ///
    /// ## Examples
    /// - New password equals the old one
    /// - Changing the email to the current email
    #[error("{0}")]
    BusinessRule(String),

    /// The email is already registered to another user.
    #[error("Email already in use")]
    DuplicateEmail,

    /// The username is already taken by another user.
    #[error("Username '{username}' already in use")]
    DuplicateUsername { username: String },

    /// The authenticated user does not exist (deleted after token issuance).
    #[error("User {0} not found")]
    UserNotFound(i64),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Why a single field was rejected.
///
/// Produced by the [`crate::validation`] functions before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, null or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Invalid format (e.g., unparseable decimal, malformed URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an OutOfRange error from any displayable bounds.
    pub fn out_of_range(
        field: impl Into<String>,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateName {
            name: "Desk Lamp".to_string(),
        };
        assert_eq!(err.to_string(), "There is already a product named 'Desk Lamp'");

        assert_eq!(CoreError::EmptyPatch.to_string(), "No data provided");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooShort {
            field: "name".to_string(),
            min: 2,
        };
        assert_eq!(err.to_string(), "name must be at least 2 characters");

        let err = ValidationError::out_of_range("price", "0.00", "999999.99");
        assert_eq!(err.to_string(), "price must be between 0.00 and 999999.99");
        assert_eq!(err.field(), "price");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("price").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "price is required");
    }
}
