//! # Services
//!
//! Orchestration between the HTTP layer, validation and the repositories.
//! Each service operation runs validate → guard → check → write → re-load and
//! stops at the first failure, so a rejected request never writes.
//!
//! - [`product_service::ProductService`] - Product mutations and analytics
//! - [`user_service::UserService`] - Account and profile changes

pub mod product_service;
pub mod user_service;

pub use product_service::ProductService;
pub use user_service::UserService;

use stockroom_core::{CoreError, ValidationError};
use stockroom_db::DbError;
use thiserror::Error;

/// Everything a service operation can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule or validation rejection.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database failed underneath us.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Failure outside both (e.g. a panicked blocking task).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
