use std::sync::Arc;
use uuid::Uuid;

use crate::application::fields::{nullable, optional};
use crate::application::views::CompanyView;
use crate::domain::auth::value_objects::Email;
use crate::domain::company::{
  CompanyError, CompanyService, CompanyUpdate, PartyName, PersonType, PhoneNumber, PostalAddress,
  TaxId, ValidationError,
};

/// Partial update: absent fields are left untouched, `Some(None)` clears
/// an optional field
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanyCommand {
  pub company_id: Uuid,
  pub name: Option<String>,
  pub tax_id: Option<String>,
  pub person_type: Option<String>,
  pub email: Option<Option<String>>,
  pub phone: Option<Option<String>>,
  pub address: Option<Option<String>>,
}

pub struct UpdateCompanyUseCase {
  company_service: Arc<CompanyService>,
}

impl UpdateCompanyUseCase {
  pub fn new(company_service: Arc<CompanyService>) -> Self {
    Self { company_service }
  }

  pub async fn execute(&self, command: UpdateCompanyCommand) -> Result<CompanyView, CompanyError> {
    let update = CompanyUpdate {
      name: optional(command.name, PartyName::new)?,
      tax_id: optional(command.tax_id, TaxId::new)?,
      person_type: optional(command.person_type, |p| p.parse::<PersonType>())?,
      email: nullable(command.email, |e| {
        Email::new(e).map_err(ValidationError::from)
      })?,
      phone: nullable(command.phone, PhoneNumber::new)?,
      address: nullable(command.address, PostalAddress::new)?,
    };

    let company = self
      .company_service
      .update_company(command.company_id, update)
      .await?;

    Ok(CompanyView::from(&company))
  }
}
