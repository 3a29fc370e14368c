use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::auth::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum CompanyError {
  #[error("Company {0} not found")]
  NotFound(Uuid),

  #[error("A company with tax id {0} already exists")]
  TaxIdAlreadyExists(String),

  #[error("Company {0} still has clients or invoices")]
  HasDependents(Uuid),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),
}

impl From<sqlx::Error> for CompanyError {
  fn from(error: sqlx::Error) -> Self {
    CompanyError::Repository(RepositoryError::from(error))
  }
}

/// Field-level validation failures shared by companies and clients
#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Name must be at least {min} characters")]
  NameTooShort { min: usize },

  #[error("Name must be at most {max} characters")]
  NameTooLong { max: usize },

  #[error("Tax id must be between {min} and {max} characters")]
  TaxIdInvalidLength { min: usize, max: usize },

  #[error("Tax id may only contain letters A-Z, Ñ, & and digits")]
  TaxIdInvalidCharacters,

  #[error("Tax id for person type '{person_type}' must be exactly {expected} characters")]
  TaxIdPersonTypeMismatch {
    person_type: &'static str,
    expected: usize,
  },

  #[error("Invalid person type '{0}' (expected individual or organization)")]
  InvalidPersonType(String),

  #[error("Phone number must be at most {max} characters")]
  PhoneNumberTooLong { max: usize },

  #[error("Phone number contains invalid characters (only digits, spaces, +, -, (, ) allowed)")]
  PhoneNumberInvalidCharacters,

  #[error("Address must be at most {max} characters")]
  AddressTooLong { max: usize },

  #[error("{0}")]
  InvalidEmail(#[from] ValueObjectError),
}
