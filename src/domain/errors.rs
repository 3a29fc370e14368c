use thiserror::Error;

/// SQLSTATE for a unique constraint violation
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for a foreign key constraint violation
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Storage failures shared by every repository
///
/// Repositories translate the constraint violations they expect into their
/// own domain errors first; whatever is left ends up here.
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database unavailable: {0}")]
  Unavailable(String),

  #[error("Record not found")]
  NotFound,

  #[error("Unique constraint violated: {0}")]
  DuplicateKey(String),

  #[error("Foreign key constraint violated: {0}")]
  ForeignKey(String),

  #[error("Database error: {0}")]
  Database(String),
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        let constraint = db_err
          .constraint()
          .map(str::to_string)
          .unwrap_or_else(|| db_err.message().to_string());

        match db_err.code().as_deref() {
          Some(UNIQUE_VIOLATION) => RepositoryError::DuplicateKey(constraint),
          Some(FOREIGN_KEY_VIOLATION) => RepositoryError::ForeignKey(constraint),
          _ => RepositoryError::Database(db_err.message().to_string()),
        }
      }
      sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
        RepositoryError::Unavailable(error.to_string())
      }
      other => RepositoryError::Database(other.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_not_found_maps_to_not_found() {
    assert!(matches!(
      RepositoryError::from(sqlx::Error::RowNotFound),
      RepositoryError::NotFound
    ));
  }

  #[test]
  fn test_pool_errors_are_unavailable() {
    assert!(matches!(
      RepositoryError::from(sqlx::Error::PoolTimedOut),
      RepositoryError::Unavailable(_)
    ));
    assert!(matches!(
      RepositoryError::from(sqlx::Error::PoolClosed),
      RepositoryError::Unavailable(_)
    ));
  }

  #[test]
  fn test_other_errors_keep_their_message() {
    let error = RepositoryError::from(sqlx::Error::Protocol("unexpected message".to_string()));
    assert!(error.to_string().contains("unexpected message"));
  }
}
