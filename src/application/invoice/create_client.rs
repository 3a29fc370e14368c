use std::sync::Arc;
use uuid::Uuid;

use crate::application::fields::optional;
use crate::application::views::ClientView;
use crate::domain::auth::value_objects::Email;
use crate::domain::company::{
  PartyName, PersonType, PhoneNumber, PostalAddress, TaxId, ValidationError,
};
use crate::domain::invoice::{InvoiceError, InvoiceService, NewClient};

#[derive(Debug, Clone)]
pub struct CreateClientCommand {
  pub company_id: Option<Uuid>,
  pub name: String,
  pub tax_id: Option<String>,
  pub person_type: String,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
}

pub struct CreateClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: CreateClientCommand) -> Result<ClientView, InvoiceError> {
    let data = NewClient {
      company_id: command.company_id,
      name: PartyName::new(command.name)?,
      tax_id: optional(command.tax_id, TaxId::new)?,
      person_type: command.person_type.parse::<PersonType>()?,
      email: optional(command.email, |e| {
        Email::new(e).map_err(ValidationError::from)
      })?,
      phone: optional(command.phone, PhoneNumber::new)?,
      address: optional(command.address, PostalAddress::new)?,
    };

    let client = self.invoice_service.create_client(data).await?;

    Ok(ClientView::build(&client, None, false))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::InMemoryStore;

  fn use_case(store: &InMemoryStore) -> CreateClientUseCase {
    CreateClientUseCase::new(store.invoice_service())
  }

  fn command(company_id: Option<Uuid>) -> CreateClientCommand {
    CreateClientCommand {
      company_id,
      name: "María García Hernández".to_string(),
      tax_id: Some("gahm850505def".to_string()),
      person_type: "FISICA".to_string(),
      email: None,
      phone: None,
      address: Some("Calle 5 de Mayo 12, Puebla".to_string()),
    }
  }

  #[tokio::test]
  async fn test_create_client_for_company() {
    let store = InMemoryStore::default();
    let company = store.seed_company("Servicios Tech SA de CV", "STE850101ABC");

    let view = use_case(&store).execute(command(Some(company.id))).await.unwrap();

    assert_eq!(view.company_id, Some(company.id));
    assert_eq!(view.tax_id.as_deref(), Some("GAHM850505DEF"));
    assert_eq!(view.person_type, PersonType::Individual);
  }

  #[tokio::test]
  async fn test_client_without_company_or_tax_id() {
    let store = InMemoryStore::default();
    let mut command = command(None);
    command.tax_id = None;

    let view = use_case(&store).execute(command).await.unwrap();

    assert!(view.company_id.is_none());
    assert!(view.tax_id.is_none());
  }

  #[tokio::test]
  async fn test_unknown_company_is_not_found() {
    let store = InMemoryStore::default();
    let missing = Uuid::new_v4();

    let result = use_case(&store).execute(command(Some(missing))).await;

    assert!(matches!(result, Err(InvoiceError::CompanyNotFound(id)) if id == missing));
  }

  #[tokio::test]
  async fn test_invalid_person_type() {
    let store = InMemoryStore::default();
    let mut command = command(None);
    command.person_type = "robot".to_string();

    let result = use_case(&store).execute(command).await;

    assert!(matches!(
      result,
      Err(InvoiceError::PartyValidation(ValidationError::InvalidPersonType(_)))
    ));
  }
}
