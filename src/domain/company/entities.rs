use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ValidationError;
use super::value_objects::{PartyName, PersonType, PhoneNumber, PostalAddress, TaxId};
use crate::domain::auth::value_objects::Email;

/// An issuing company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
  pub id: Uuid,
  pub name: PartyName,
  /// Unique across companies
  pub tax_id: TaxId,
  pub person_type: PersonType,
  pub email: Option<Email>,
  pub phone: Option<PhoneNumber>,
  pub address: Option<PostalAddress>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Validated fields for a company that does not exist yet
#[derive(Debug, Clone)]
pub struct NewCompany {
  pub name: PartyName,
  pub tax_id: TaxId,
  pub person_type: PersonType,
  pub email: Option<Email>,
  pub phone: Option<PhoneNumber>,
  pub address: Option<PostalAddress>,
}

/// Partial update. `None` keeps the current value; for the nullable
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
  pub name: Option<PartyName>,
  pub tax_id: Option<TaxId>,
  pub person_type: Option<PersonType>,
  pub email: Option<Option<Email>>,
  pub phone: Option<Option<PhoneNumber>>,
  pub address: Option<Option<PostalAddress>>,
}

impl Company {
  pub fn new(data: NewCompany) -> Result<Self, ValidationError> {
    data.tax_id.check_person_type(data.person_type)?;

    let now = Utc::now();
    Ok(Self {
      id: Uuid::new_v4(),
      name: data.name,
      tax_id: data.tax_id,
      person_type: data.person_type,
      email: data.email,
      phone: data.phone,
      address: data.address,
      created_at: now,
      updated_at: now,
    })
  }

  /// Applies a partial update; on error the company is left untouched
  pub fn apply(&mut self, update: CompanyUpdate) -> Result<(), ValidationError> {
    let person_type = update.person_type.unwrap_or(self.person_type);
    let tax_id = update.tax_id.unwrap_or_else(|| self.tax_id.clone());
    tax_id.check_person_type(person_type)?;

    self.person_type = person_type;
    self.tax_id = tax_id;
    if let Some(name) = update.name {
      self.name = name;
    }
    if let Some(email) = update.email {
      self.email = email;
    }
    if let Some(phone) = update.phone {
      self.phone = phone;
    }
    if let Some(address) = update.address {
      self.address = address;
    }
    self.updated_at = Utc::now();

    Ok(())
  }
}
