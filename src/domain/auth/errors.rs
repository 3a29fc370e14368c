use thiserror::Error;

use super::value_objects::ValueObjectError;
use crate::domain::errors::RepositoryError;

/// Everything that can go wrong while registering, logging in or resolving a token
#[derive(Debug, Error)]
pub enum AuthError {
  /// Unknown email or wrong password; the two are never told apart
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Email already exists")]
  EmailAlreadyExists,

  /// The session outlived its user
  #[error("User not found")]
  UserNotFound,

  /// Unknown, revoked or expired token
  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Password hashing error: {0}")]
  Hash(#[from] HashError),

  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

/// Password hashing failures; a wrong password is not one of them
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Invalid hashing parameters: {0}")]
  InvalidParams(String),

  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Stored password hash is malformed: {0}")]
  MalformedHash(String),

  #[error("Hashing task failed: {0}")]
  TaskFailed(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sqlx_errors_become_repository_errors() {
    let error = AuthError::from(sqlx::Error::RowNotFound);
    assert!(matches!(
      error,
      AuthError::Repository(RepositoryError::NotFound)
    ));
  }

  #[test]
  fn test_messages_do_not_leak_which_credential_failed() {
    assert_eq!(
      AuthError::InvalidCredentials.to_string(),
      "Invalid credentials provided"
    );
  }
}
