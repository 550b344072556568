//! Persistence error model.

use thiserror::Error;

use farmgate_core::DomainError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surface of the stores: domain failures pass through untouched so
/// the API layer can map them precisely; everything else is a database error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Collapse `RowNotFound` into the domain-level not-found.
    pub fn from_fetch(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::Domain(DomainError::NotFound),
            other => StoreError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_maps_to_domain_not_found() {
        assert!(matches!(
            StoreError::from_fetch(sqlx::Error::RowNotFound),
            StoreError::Domain(DomainError::NotFound)
        ));
    }

    #[test]
    fn other_fetch_errors_stay_database_errors() {
        assert!(matches!(
            StoreError::from_fetch(sqlx::Error::PoolClosed),
            StoreError::Database(_)
        ));
    }
}
