use std::sync::Arc;
use uuid::Uuid;

use crate::application::fields::{nullable, optional};
use crate::application::views::ClientView;
use crate::domain::auth::value_objects::Email;
use crate::domain::company::{
  PartyName, PersonType, PhoneNumber, PostalAddress, TaxId, ValidationError,
};
use crate::domain::invoice::{ClientUpdate, InvoiceError, InvoiceService};

/// Partial update: absent fields are left untouched, `Some(None)` clears
/// an optional field
#[derive(Debug, Clone, Default)]
pub struct UpdateClientCommand {
  pub client_id: Uuid,
  pub company_id: Option<Option<Uuid>>,
  pub name: Option<String>,
  pub tax_id: Option<Option<String>>,
  pub person_type: Option<String>,
  pub email: Option<Option<String>>,
  pub phone: Option<Option<String>>,
  pub address: Option<Option<String>>,
}

pub struct UpdateClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: UpdateClientCommand) -> Result<ClientView, InvoiceError> {
    let update = ClientUpdate {
      company_id: command.company_id,
      name: optional(command.name, PartyName::new)?,
      tax_id: nullable(command.tax_id, TaxId::new)?,
      person_type: optional(command.person_type, |p| p.parse::<PersonType>())?,
      email: nullable(command.email, |e| {
        Email::new(e).map_err(ValidationError::from)
      })?,
      phone: nullable(command.phone, PhoneNumber::new)?,
      address: nullable(command.address, PostalAddress::new)?,
    };

    let client = self
      .invoice_service
      .update_client(command.client_id, update)
      .await?;

    Ok(ClientView::build(&client, None, false))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::InMemoryStore;

  async fn setup() -> (UpdateClientUseCase, Uuid, Uuid) {
    let store = InMemoryStore::default();
    let company = store.seed_company("Servicios Tech SA de CV", "STE850101ABC");
    let client = store.seed_client_for(company.id);
    let use_case = UpdateClientUseCase::new(store.invoice_service());
    (use_case, client.id, company.id)
  }

  #[tokio::test]
  async fn test_detach_client_from_company() {
    let (use_case, client_id, _) = setup().await;

    let view = use_case
      .execute(UpdateClientCommand {
        client_id,
        company_id: Some(None),
        email: Some(Some("compras@norte.mx".to_string())),
        ..Default::default()
      })
      .await
      .unwrap();

    assert!(view.company_id.is_none());
    assert_eq!(view.email.as_deref(), Some("compras@norte.mx"));
    assert_eq!(view.name, "Distribuidora Norte SA");
  }

  #[tokio::test]
  async fn test_move_to_unknown_company_fails() {
    let (use_case, client_id, _) = setup().await;

    let result = use_case
      .execute(UpdateClientCommand {
        client_id,
        company_id: Some(Some(Uuid::new_v4())),
        ..Default::default()
      })
      .await;

    assert!(matches!(result, Err(InvoiceError::CompanyNotFound(_))));
  }

  #[tokio::test]
  async fn test_person_type_change_must_fit_tax_id() {
    let (use_case, client_id, company_id) = setup().await;

    let result = use_case
      .execute(UpdateClientCommand {
        client_id,
        person_type: Some("individual".to_string()),
        ..Default::default()
      })
      .await;
    assert!(matches!(result, Err(InvoiceError::PartyValidation(_))));

    let view = use_case
      .execute(UpdateClientCommand {
        client_id,
        person_type: Some("individual".to_string()),
        tax_id: Some(Some("GAHM850505DEF".to_string())),
        ..Default::default()
      })
      .await
      .unwrap();
    assert_eq!(view.person_type, PersonType::Individual);
    assert_eq!(view.company_id, Some(company_id));
  }
}
