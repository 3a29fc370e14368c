use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;

/// Name of a company or client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyName(String);

impl PartyName {
  pub const MAX_LENGTH: usize = 255;

  pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
    let name = name.into().trim().to_string();

    if name.is_empty() {
      return Err(ValidationError::NameTooShort { min: 1 });
    }

    if name.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::NameTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

/// Whether a party is a natural person or a legal entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
  Individual,
  Organization,
}

impl PersonType {
  pub fn as_str(&self) -> &'static str {
    match self {
      PersonType::Individual => "individual",
      PersonType::Organization => "organization",
    }
  }

  /// Exact tax-id length for this person type
  pub fn tax_id_length(&self) -> usize {
    match self {
      PersonType::Individual => 13,
      PersonType::Organization => 12,
    }
  }
}

impl FromStr for PersonType {
  type Err = ValidationError;

  /// Accepts the canonical names and the Mexican FISICA / MORAL labels
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "individual" | "fisica" | "física" => Ok(PersonType::Individual),
      "organization" | "moral" => Ok(PersonType::Organization),
      other => Err(ValidationError::InvalidPersonType(other.to_string())),
    }
  }
}

impl fmt::Display for PersonType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Fiscal identifier (RFC)
///
/// 12 to 13 characters from `A-Z`, `Ñ`, `&` and digits, stored upper-cased.
/// The exact length depends on the person type, see [`TaxId::check_person_type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxId(String);

impl TaxId {
  pub const MIN_LENGTH: usize = 12;
  pub const MAX_LENGTH: usize = 13;

  pub fn new(tax_id: impl Into<String>) -> Result<Self, ValidationError> {
    let tax_id = tax_id.into().trim().to_uppercase();
    let length = tax_id.chars().count();

    if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
      return Err(ValidationError::TaxIdInvalidLength {
        min: Self::MIN_LENGTH,
        max: Self::MAX_LENGTH,
      });
    }

    if !tax_id
      .chars()
      .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, 'Ñ' | '&'))
    {
      return Err(ValidationError::TaxIdInvalidCharacters);
    }

    Ok(Self(tax_id))
  }

  pub fn check_person_type(&self, person_type: PersonType) -> Result<(), ValidationError> {
    let expected = person_type.tax_id_length();
    if self.0.chars().count() != expected {
      return Err(ValidationError::TaxIdPersonTypeMismatch {
        person_type: person_type.as_str(),
        expected,
      });
    }
    Ok(())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for TaxId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Phone number value object with basic validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
  pub const MAX_LENGTH: usize = 50;

  pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
    let phone = phone.into().trim().to_string();

    if phone.len() > Self::MAX_LENGTH {
      return Err(ValidationError::PhoneNumberTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    if phone.is_empty()
      || !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
      return Err(ValidationError::PhoneNumberInvalidCharacters);
    }

    Ok(Self(phone))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

/// Free-text postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress(String);

impl PostalAddress {
  pub const MAX_LENGTH: usize = 500;

  pub fn new(address: impl Into<String>) -> Result<Self, ValidationError> {
    let address = address.into().trim().to_string();

    if address.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::AddressTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(address))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}
