use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::views::UserView;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Auth
// ============================================================================

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Name must be between 1 and 255 characters"
  ))]
  pub name: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,

  #[validate(must_match(other = "password", message = "Password confirmation does not match"))]
  pub password_confirmation: String,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Response after a successful registration or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
  pub message: String,

  /// Bearer token for the `Authorization` header
  pub token: String,

  /// Always `Bearer`
  pub token_type: String,

  pub user: UserView,
}

impl AuthResponse {
  pub fn bearer(message: impl Into<String>, token: String, user: UserView) -> Self {
    Self {
      message: message.into(),
      token,
      token_type: "Bearer".to_string(),
      user,
    }
  }
}

/// Response wrapping the authenticated user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
  pub user: UserView,
}

/// Generic success response
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

// ============================================================================
// Shared
// ============================================================================

/// Single resource envelope: `{ "data": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
  pub data: T,
}

impl<T> DataResponse<T> {
  pub fn new(data: T) -> Self {
    Self { data }
  }
}

/// `?page=N` on list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
  pub page: Option<u32>,
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type identifier
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional field-level details
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

// ============================================================================
// Companies
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,

  #[validate(length(min = 1, message = "Tax id is required"))]
  pub tax_id: String,

  /// `individual` / `organization` (aliases `FISICA` / `MORAL`)
  #[validate(length(min = 1, message = "Person type is required"))]
  pub person_type: String,

  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
}

/// Partial update; `null` clears an optional field
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: Option<String>,

  pub tax_id: Option<String>,
  pub person_type: Option<String>,

  #[serde(default, deserialize_with = "double_option")]
  pub email: Option<Option<String>>,

  #[serde(default, deserialize_with = "double_option")]
  pub phone: Option<Option<String>>,

  #[serde(default, deserialize_with = "double_option")]
  pub address: Option<Option<String>>,
}

// ============================================================================
// Clients
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientRequest {
  pub company_id: Option<Uuid>,

  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,

  pub tax_id: Option<String>,

  #[validate(length(min = 1, message = "Person type is required"))]
  pub person_type: String,

  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClientRequest {
  #[serde(default, deserialize_with = "double_option")]
  pub company_id: Option<Option<Uuid>>,

  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: Option<String>,

  #[serde(default, deserialize_with = "double_option")]
  pub tax_id: Option<Option<String>>,

  pub person_type: Option<String>,

  #[serde(default, deserialize_with = "double_option")]
  pub email: Option<Option<String>>,

  #[serde(default, deserialize_with = "double_option")]
  pub phone: Option<Option<String>>,

  #[serde(default, deserialize_with = "double_option")]
  pub address: Option<Option<String>>,
}

// ============================================================================
// Invoices
// ============================================================================

/// One line of an invoice; amounts accept JSON numbers or decimal strings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceItemRequest {
  #[validate(length(min = 1, message = "Item description is required"))]
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
  pub company_id: Uuid,
  pub client_id: Uuid,
  pub date: NaiveDate,

  #[validate(length(max = 50, message = "Status must be at most 50 characters"))]
  pub status: Option<String>,

  pub currency: Option<String>,

  #[validate(length(min = 1, message = "At least one item is required"), nested)]
  pub items: Vec<InvoiceItemRequest>,
}

/// Partial update; when `items` is present it replaces every existing item
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
  pub company_id: Option<Uuid>,
  pub client_id: Option<Uuid>,
  pub date: Option<NaiveDate>,

  #[validate(length(max = 50, message = "Status must be at most 50 characters"))]
  pub status: Option<String>,

  pub currency: Option<String>,

  #[validate(length(min = 1, message = "At least one item is required"), nested)]
  pub items: Option<Vec<InvoiceItemRequest>>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_register_request_password_confirmation() {
    let request: RegisterRequest = serde_json::from_value(serde_json::json!({
      "name": "Ana",
      "email": "ana@example.com",
      "password": "password123",
      "password_confirmation": "password124"
    }))
    .unwrap();

    let errors = request.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("password_confirmation"));
  }

  #[test]
  fn test_login_request_validation() {
    let request = LoginRequest {
      email: "invalid-email".to_string(),
      password: String::new(),
    };

    let errors = request.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("email"));
    assert!(errors.field_errors().contains_key("password"));
  }

  #[test]
  fn test_update_distinguishes_null_from_absent() {
    let request: UpdateCompanyRequest =
      serde_json::from_value(serde_json::json!({ "email": null, "name": "Nuevo" })).unwrap();

    assert_eq!(request.email, Some(None));
    assert_eq!(request.phone, None);
    assert_eq!(request.name.as_deref(), Some("Nuevo"));
  }

  #[test]
  fn test_invoice_items_accept_numbers_and_strings() {
    let request: CreateInvoiceRequest = serde_json::from_value(serde_json::json!({
      "company_id": Uuid::new_v4(),
      "client_id": Uuid::new_v4(),
      "date": "2024-01-15",
      "items": [
        { "description": "Consultoría", "quantity": 1, "unit_price": "10000" },
        { "description": "Soporte", "quantity": "5", "unit_price": 1000.5 }
      ]
    }))
    .unwrap();

    assert!(request.validate().is_ok());
    assert_eq!(request.items[0].unit_price, dec!(10000));
    assert_eq!(request.items[1].quantity, dec!(5));
    assert_eq!(request.items[1].unit_price, dec!(1000.5));
  }

  #[test]
  fn test_invoice_request_requires_items() {
    let request: CreateInvoiceRequest = serde_json::from_value(serde_json::json!({
      "company_id": Uuid::new_v4(),
      "client_id": Uuid::new_v4(),
      "date": "2024-01-15",
      "items": []
    }))
    .unwrap();

    let errors = request.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("items"));
  }

  #[test]
  fn test_auth_response_is_bearer() {
    let response = AuthResponse::bearer(
      "Login successful",
      "abc".to_string(),
      UserView {
        id: Uuid::new_v4(),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
      },
    );

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["user"]["name"], "Ana");
  }
}
