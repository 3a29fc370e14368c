use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::value_objects::ValueObjectError;
use crate::domain::company::CompanyError;
use crate::domain::invoice::InvoiceError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Malformed or out-of-range input (422)
  Validation {
    message: String,
    details: Option<serde_json::Value>,
  },

  /// Unknown company, client or invoice (404)
  NotFound(String),

  /// Duplicate key or a delete blocked by dependents (409)
  Conflict(String),

  /// Missing or rejected credentials (401)
  Auth(AuthErrorKind),

  /// Infrastructure failure (500); the message is logged, never returned
  Internal(String),
}

/// Authentication error kinds, all answered with 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  InvalidCredentials,
  InvalidSession,
  InvalidToken,
}

impl ApiError {
  pub fn validation(message: impl Into<String>) -> Self {
    ApiError::Validation {
      message: message.into(),
      details: None,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation { message, .. } => write!(f, "Validation error: {}", message),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let (error_type, message, details) = match self {
      ApiError::Validation { message, details } => {
        ("validation_error", message.clone(), details.clone())
      }
      ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
      ApiError::Conflict(msg) => ("conflict", msg.clone(), None),
      ApiError::Auth(kind) => {
        let (err_type, msg) = match kind {
          AuthErrorKind::InvalidCredentials => ("invalid_credentials", "Invalid email or password"),
          AuthErrorKind::InvalidSession => ("invalid_session", "Invalid or expired session"),
          AuthErrorKind::InvalidToken => {
            ("invalid_token", "Invalid or missing authorization token")
          }
        };
        (err_type, msg.to_string(), None)
      }
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
          None,
        )
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: error_type.to_string(),
        message,
        details,
      })
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::InvalidSession | AuthError::UserNotFound => {
        ApiError::Auth(AuthErrorKind::InvalidSession)
      }
      AuthError::EmailAlreadyExists => {
        ApiError::Conflict("An account with this email already exists".to_string())
      }
      AuthError::Validation(ValueObjectError::InvalidToken) => {
        ApiError::Auth(AuthErrorKind::InvalidToken)
      }
      AuthError::Validation(err) => ApiError::validation(err.to_string()),
      AuthError::Repository(err) => ApiError::Internal(err.to_string()),
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
    }
  }
}

impl From<CompanyError> for ApiError {
  fn from(error: CompanyError) -> Self {
    match error {
      CompanyError::NotFound(_) => ApiError::NotFound(error.to_string()),
      CompanyError::TaxIdAlreadyExists(_) | CompanyError::HasDependents(_) => {
        ApiError::Conflict(error.to_string())
      }
      CompanyError::Validation(e) => ApiError::validation(e.to_string()),
      CompanyError::Repository(e) => ApiError::Internal(format!("Repository error: {}", e)),
    }
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(_)
      | InvoiceError::PartyValidation(_)
      | InvoiceError::NoItems
      | InvoiceError::MissingInvoiceIds
      | InvoiceError::InvalidInvoiceId(_) => ApiError::validation(error.to_string()),
      InvoiceError::CompanyNotFound(_)
      | InvoiceError::ClientNotFound(_)
      | InvoiceError::InvoiceNotFound(_)
      | InvoiceError::NoInvoicesFound => ApiError::NotFound(error.to_string()),
      InvoiceError::ClientHasInvoices(_) => ApiError::Conflict(error.to_string()),
      InvoiceError::PdfGenerationFailed(_)
      | InvoiceError::CsvExportFailed(_)
      | InvoiceError::Repository(_)
      | InvoiceError::Database(_) => ApiError::Internal(error.to_string()),
    }
  }
}

/// Field errors from the validator crate, reported per field under `details`
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut fields = serde_json::Map::new();
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
      let field_messages: Vec<String> = field_errors
        .iter()
        .map(|error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field))
        })
        .collect();
      messages.extend(field_messages.iter().cloned());
      fields.insert(field.to_string(), serde_json::json!(field_messages));
    }

    // Nested item errors do not show up in field_errors()
    if messages.is_empty() {
      messages.push(errors.to_string());
    }

    ApiError::Validation {
      message: messages.join(", "),
      details: Some(serde_json::Value::Object(fields)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;
  use uuid::Uuid;

  async fn body_json(error: ApiError) -> serde_json::Value {
    let bytes = to_bytes(error.error_response().into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::validation("test").status_code(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      ApiError::NotFound("test".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Conflict("test".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidToken).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::EmailAlreadyExists.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = AuthError::Validation(ValueObjectError::InvalidToken).into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::Validation(ValueObjectError::NameEmpty).into();
    assert_eq!(api_error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[test]
  fn test_company_error_conversion() {
    let id = Uuid::new_v4();
    assert_eq!(
      ApiError::from(CompanyError::NotFound(id)).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::from(CompanyError::HasDependents(id)).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::from(CompanyError::TaxIdAlreadyExists("STE850101ABC".to_string())).status_code(),
      StatusCode::CONFLICT
    );
  }

  #[test]
  fn test_invoice_error_conversion() {
    let id = Uuid::new_v4();
    assert_eq!(
      ApiError::from(InvoiceError::NoItems).status_code(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      ApiError::from(InvoiceError::MissingInvoiceIds).status_code(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      ApiError::from(InvoiceError::NoInvoicesFound).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::from(InvoiceError::ClientHasInvoices(id)).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::from(InvoiceError::PdfGenerationFailed("boom".to_string())).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[actix_web::test]
  async fn test_error_body_shape() {
    let json = body_json(ApiError::NotFound("Invoice not found".to_string())).await;
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["message"], "Invoice not found");
    assert!(json.get("details").is_none());
  }

  #[actix_web::test]
  async fn test_internal_details_are_hidden() {
    let json = body_json(ApiError::Internal("connection refused".to_string())).await;
    assert_eq!(json["error"], "internal_error");
    assert_eq!(json["message"], "An internal server error occurred");
  }
}
