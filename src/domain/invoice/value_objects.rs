use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),
  #[error("Invalid status: {0}")]
  InvalidStatus(String),
  #[error("Invalid line item description: {0}")]
  InvalidDescription(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid unit price: {0}")]
  InvalidUnitPrice(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
}

// Currency - three-letter code, stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
  pub const DEFAULT: &'static str = "MXN";

  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into().trim().to_uppercase();
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
      return Err(ValueObjectError::InvalidCurrency(format!(
        "'{}' must be a three-letter code",
        value
      )));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl Default for Currency {
  fn default() -> Self {
    Self(Self::DEFAULT.to_string())
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status - opaque label, no transitions are enforced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceStatus(String);

impl InvoiceStatus {
  pub const DEFAULT: &'static str = "draft";
  pub const MAX_LENGTH: usize = 50;

  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidStatus(
        "Status cannot be empty".to_string(),
      ));
    }
    if trimmed.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::InvalidStatus(format!(
        "Status cannot exceed {} characters",
        Self::MAX_LENGTH
      )));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl Default for InvoiceStatus {
  fn default() -> Self {
    Self(Self::DEFAULT.to_string())
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Item Description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescription(String);

impl ItemDescription {
  pub const MAX_LENGTH: usize = 255;

  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot be empty".to_string(),
      ));
    }
    if trimmed.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::InvalidDescription(format!(
        "Description cannot exceed {} characters",
        Self::MAX_LENGTH
      )));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// Quantity - strictly positive, at most 4 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(Decimal);

impl Quantity {
  pub const MAX_SCALE: u32 = 4;

  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be greater than zero".to_string(),
      ));
    }
    if value.normalize().scale() > Self::MAX_SCALE {
      return Err(ValueObjectError::InvalidQuantity(format!(
        "Quantity cannot have more than {} decimal places (invoice precision policy)",
        Self::MAX_SCALE
      )));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

// Unit Price - non-negative, at most 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
  pub const MAX_SCALE: u32 = 2;

  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO {
      return Err(ValueObjectError::InvalidUnitPrice(
        "Unit price cannot be negative".to_string(),
      ));
    }
    if value.normalize().scale() > Self::MAX_SCALE {
      return Err(ValueObjectError::InvalidUnitPrice(format!(
        "Unit price cannot have more than {} decimal places (invoice precision policy, cents)",
        Self::MAX_SCALE
      )));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_scale_limits_name_the_precision_policy() {
    assert!(Quantity::new(dec!(0.0001)).is_ok());
    assert!(UnitPrice::new(dec!(0.01)).is_ok());
    assert!(UnitPrice::new(dec!(10.500)).is_ok());

    let quantity = Quantity::new(dec!(1.00001)).unwrap_err().to_string();
    assert!(quantity.contains("4 decimal places (invoice precision policy)"));

    let price = UnitPrice::new(dec!(9.999)).unwrap_err().to_string();
    assert!(price.contains("2 decimal places (invoice precision policy, cents)"));
  }

  #[test]
  fn test_currency_normalizes_case() {
    assert_eq!(Currency::new(" usd ").unwrap().value(), "USD");
    assert_eq!(Currency::default().value(), "MXN");
  }

  #[test]
  fn test_currency_rejects_invalid_codes() {
    assert!(Currency::new("PESOS").is_err());
    assert!(Currency::new("M1N").is_err());
    assert!(Currency::new("").is_err());
  }

  #[test]
  fn test_status_is_free_form_with_length_limit() {
    assert_eq!(InvoiceStatus::new("SENT").unwrap().value(), "SENT");
    assert_eq!(InvoiceStatus::new("en revisión").unwrap().value(), "en revisión");
    assert!(InvoiceStatus::new(" ").is_err());
    assert!(InvoiceStatus::new("x".repeat(51)).is_err());
    assert_eq!(InvoiceStatus::default().value(), "draft");
  }

  #[test]
  fn test_description_validation() {
    assert_eq!(
      ItemDescription::new("  Desarrollo web ").unwrap().value(),
      "Desarrollo web"
    );
    assert!(ItemDescription::new("").is_err());
    assert!(ItemDescription::new("d".repeat(256)).is_err());
  }

  #[test]
  fn test_quantity_must_be_positive() {
    assert!(Quantity::new(dec!(0)).is_err());
    assert!(Quantity::new(dec!(-1)).is_err());
    assert!(Quantity::new(dec!(0.01)).is_ok());
  }

  #[test]
  fn test_quantity_scale_limit_ignores_trailing_zeros() {
    assert!(Quantity::new(dec!(1.2345)).is_ok());
    assert!(Quantity::new(dec!(1.23456)).is_err());
    assert!(Quantity::new(dec!(2.500000)).is_ok());
  }

  #[test]
  fn test_unit_price_rules() {
    assert!(UnitPrice::new(dec!(0)).is_ok());
    assert!(UnitPrice::new(dec!(-0.01)).is_err());
    assert!(UnitPrice::new(dec!(10.005)).is_err());
    assert!(UnitPrice::new(dec!(10.50)).is_ok());
  }
}
