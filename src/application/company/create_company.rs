use std::sync::Arc;

use crate::application::fields::optional;
use crate::application::views::CompanyView;
use crate::domain::auth::value_objects::Email;
use crate::domain::company::{
  CompanyError, CompanyService, NewCompany, PartyName, PersonType, PhoneNumber, PostalAddress,
  TaxId, ValidationError,
};

#[derive(Debug, Clone)]
pub struct CreateCompanyCommand {
  pub name: String,
  pub tax_id: String,
  pub person_type: String,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
}

pub struct CreateCompanyUseCase {
  company_service: Arc<CompanyService>,
}

impl CreateCompanyUseCase {
  pub fn new(company_service: Arc<CompanyService>) -> Self {
    Self { company_service }
  }

  pub async fn execute(&self, command: CreateCompanyCommand) -> Result<CompanyView, CompanyError> {
    let data = NewCompany {
      name: PartyName::new(command.name)?,
      tax_id: TaxId::new(command.tax_id)?,
      person_type: command.person_type.parse::<PersonType>()?,
      email: optional(command.email, |e| {
        Email::new(e).map_err(ValidationError::from)
      })?,
      phone: optional(command.phone, PhoneNumber::new)?,
      address: optional(command.address, PostalAddress::new)?,
    };

    let company = self.company_service.create_company(data).await?;

    Ok(CompanyView::from(&company))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::InMemoryStore;

  fn command(tax_id: &str, person_type: &str) -> CreateCompanyCommand {
    CreateCompanyCommand {
      name: "Servicios Tech SA de CV".to_string(),
      tax_id: tax_id.to_string(),
      person_type: person_type.to_string(),
      email: Some("contacto@tech.mx".to_string()),
      phone: Some("".to_string()),
      address: None,
    }
  }

  fn use_case(store: &InMemoryStore) -> CreateCompanyUseCase {
    CreateCompanyUseCase::new(Arc::new(CompanyService::new(store.companies())))
  }

  #[tokio::test]
  async fn test_create_company() {
    let store = InMemoryStore::default();

    let view = use_case(&store)
      .execute(command("ste850101abc", "MORAL"))
      .await
      .unwrap();

    assert_eq!(view.tax_id, "STE850101ABC");
    assert_eq!(view.person_type, PersonType::Organization);
    assert_eq!(view.email.as_deref(), Some("contacto@tech.mx"));
    assert!(view.phone.is_none());
  }

  #[tokio::test]
  async fn test_tax_id_must_match_person_type() {
    let store = InMemoryStore::default();

    let result = use_case(&store).execute(command("STE850101ABC", "individual")).await;

    assert!(matches!(
      result,
      Err(CompanyError::Validation(ValidationError::TaxIdPersonTypeMismatch { .. }))
    ));
  }

  #[tokio::test]
  async fn test_duplicate_tax_id_conflicts() {
    let store = InMemoryStore::default();
    let use_case = use_case(&store);
    use_case.execute(command("STE850101ABC", "organization")).await.unwrap();

    let result = use_case.execute(command("STE850101ABC", "organization")).await;

    assert!(matches!(result, Err(CompanyError::TaxIdAlreadyExists(_))));
  }

  #[tokio::test]
  async fn test_invalid_email_is_a_validation_error() {
    let store = InMemoryStore::default();
    let mut command = command("STE850101ABC", "organization");
    command.email = Some("not-an-email".to_string());

    let result = use_case(&store).execute(command).await;

    assert!(matches!(
      result,
      Err(CompanyError::Validation(ValidationError::InvalidEmail(_)))
    ));
  }
}
