use super::value_objects::ValueObjectError;
use crate::domain::company::{CompanyError, ValidationError as PartyValidationError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Validation error: {0}")]
  PartyValidation(#[from] PartyValidationError),

  #[error("An invoice needs at least one item")]
  NoItems,

  #[error("At least one invoice id is required")]
  MissingInvoiceIds,

  #[error("Invalid invoice id: {0}")]
  InvalidInvoiceId(String),

  #[error("Company not found: {0}")]
  CompanyNotFound(Uuid),

  #[error("Client not found: {0}")]
  ClientNotFound(Uuid),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("No invoices found for the requested ids")]
  NoInvoicesFound,

  #[error("Client {0} still has invoices")]
  ClientHasInvoices(Uuid),

  #[error("PDF generation failed: {0}")]
  PdfGenerationFailed(String),

  #[error("CSV export failed: {0}")]
  CsvExportFailed(String),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl From<CompanyError> for InvoiceError {
  fn from(error: CompanyError) -> Self {
    match error {
      CompanyError::NotFound(id) => InvoiceError::CompanyNotFound(id),
      CompanyError::Validation(e) => InvoiceError::PartyValidation(e),
      other => InvoiceError::Repository(other.to_string()),
    }
  }
}
