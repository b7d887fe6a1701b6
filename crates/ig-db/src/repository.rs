//! Repository error types

use ig_core::error::DomainError;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored record is malformed: {0}")]
    Corrupt(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => DomainError::NotFound {
                entity: "InternshipGrade",
                id,
            },
            RepositoryError::Conflict(message) => DomainError::Conflict { message },
            RepositoryError::Database(e) => DomainError::Database(e.to_string()),
            RepositoryError::Corrupt(message) => DomainError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_domain_errors() {
        let err: DomainError = RepositoryError::NotFound("g-1".into()).into();
        assert_eq!(err.status_code(), 404);

        let err: DomainError = RepositoryError::Conflict("stale lock_version".into()).into();
        assert_eq!(err.status_code(), 409);

        let err: DomainError = RepositoryError::Corrupt("bad status".into()).into();
        assert_eq!(err.status_code(), 500);
    }
}
