//! # Database Error Types
//!
//! `sqlx` failures sorted into the cases callers act on.
//!
//! ```text
//! sqlx::Error ──► DbError ──► ServiceError (apps/api) ──► ApiError
//!                    │
//!                    └─ UniqueViolation on products.name / users.email /
//!                       advanced_users_profile.username becomes a domain
//!                       conflict in the service layer; everything else is
//!                       logged and reported as INTERNAL.
//! ```

use thiserror::Error;

/// Failure of a database operation.
#[derive(Debug, Error)]
pub enum DbError {
    /// A lookup that had to succeed found no row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write.
    ///
    /// `field` lists the indexed columns as SQLite reports them, e.g.
    /// `products.user_id, products.name`. Usually the loser of a race that
    /// slipped past an existence check.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A foreign key rejected the write (a product for an unknown user).
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database could not be opened or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration could not be applied.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for any other reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True if this is a unique violation that involves `column`.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_db::DbError;
    ///
    /// let err = DbError::duplicate("products.user_id, products.name", "unknown");
    /// assert!(err.is_unique_violation_on("products.name"));
    /// assert!(!err.is_unique_violation_on("users.email"));
    /// ```
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        match self {
            DbError::UniqueViolation { field, .. } => {
                field.split(',').any(|part| part.trim() == column)
            }
            _ => false,
        }
    }
}

/// SQLite reports constraint failures only through the message text:
///
/// ```text
/// UNIQUE constraint failed: products.user_id, products.name  → UniqueViolation
/// FOREIGN KEY constraint failed                              → ForeignKeyViolation
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if let Some(columns) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::duplicate(columns, "unknown")
                } else if msg.starts_with("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
