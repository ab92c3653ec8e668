use sea_orm::error::DbErr;
use sea_orm::SqlErr;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Maps constraint violations reported by the storage layer to
    /// `Conflict`, everything else to `DatabaseError`.
    pub fn from_write(error: DbErr) -> Self {
        match error.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ServiceError::Conflict(format!("foreign key violation: {}", msg))
            }
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                ServiceError::Conflict(format!("unique constraint violation: {}", msg))
            }
            _ => ServiceError::DatabaseError(error),
        }
    }

    pub fn not_found(entity: &str, id: i64) -> Self {
        ServiceError::NotFound(format!("{} with ID {} not found", entity, id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

/// Startup-level errors share the service taxonomy.
pub type AppError = ServiceError;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = ServiceError::not_found("Product", 12);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Product with ID 12 not found");
    }

    #[test]
    fn non_constraint_write_errors_stay_database_errors() {
        assert_matches!(
            ServiceError::from_write(DbErr::Custom("boom".into())),
            ServiceError::DatabaseError(DbErr::Custom(_))
        );
        assert_matches!(
            ServiceError::from(DbErr::RecordNotInserted),
            ServiceError::DatabaseError(DbErr::RecordNotInserted)
        );
    }
}
