use sqlx::error::ErrorKind;
use thiserror::Error;

/// Storage-specific error types for the ELID device registry.
///
/// These errors represent failures in database operations, input validation
/// and data integrity checks on devices and their transactions.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Entity not found in database
    #[error("Entity not found: {entity_type} with {field}={value}")]
    NotFound {
        entity_type: String,
        field: String,
        value: String,
    },

    /// Input rejected before reaching the database
    #[error("Validation error: {0}")]
    Validation(String),

    /// A write violated a schema constraint (unique, foreign key, check, not null)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Shorthand for a missing device.
    pub fn device_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Device".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    /// Classify an error returned by an INSERT/UPDATE/DELETE.
    ///
    /// Constraint violations reported by SQLite become [`StorageError::Constraint`];
    /// everything else stays a plain database error.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            )
        {
            return Self::Constraint(db_err.message().to_string());
        }
        Self::Database(err)
    }

    /// Returns true for [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for [`StorageError::Constraint`].
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

impl From<elid_core::Error> for StorageError {
    fn from(err: elid_core::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_not_found_message() {
        let err = StorageError::device_not_found("abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: Device with id=abc");
    }

    #[test]
    fn test_core_error_becomes_validation() {
        let err: StorageError = elid_core::Error::InvalidDeviceCategory("x".into()).into();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn test_non_database_write_error_is_not_constraint() {
        let err = StorageError::from_write(sqlx::Error::RowNotFound);
        assert!(!err.is_constraint());
    }
}
