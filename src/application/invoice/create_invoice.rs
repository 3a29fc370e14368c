use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::fields::optional;
use crate::application::views::{InvoiceRelations, InvoiceView};
use crate::domain::invoice::{
  Currency, InvoiceDetails, InvoiceError, InvoiceService, InvoiceStatus, LineItem, NewInvoice,
};

/// One requested line; its total is always computed
#[derive(Debug, Clone)]
pub struct InvoiceItemInput {
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
}

pub(crate) fn parse_items(items: Vec<InvoiceItemInput>) -> Result<Vec<LineItem>, InvoiceError> {
  if items.is_empty() {
    return Err(InvoiceError::NoItems);
  }

  items
    .into_iter()
    .map(|item| {
      LineItem::new(item.description, item.quantity, item.unit_price).map_err(InvoiceError::from)
    })
    .collect()
}

#[derive(Debug, Clone)]
pub struct CreateInvoiceCommand {
  pub company_id: Uuid,
  pub client_id: Uuid,
  pub date: NaiveDate,
  /// Defaults to `draft`
  pub status: Option<String>,
  /// Defaults to `MXN`
  pub currency: Option<String>,
  pub items: Vec<InvoiceItemInput>,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: CreateInvoiceCommand) -> Result<InvoiceView, InvoiceError> {
    let data = NewInvoice {
      company_id: command.company_id,
      client_id: command.client_id,
      date: command.date,
      status: optional(command.status, InvoiceStatus::new)?.unwrap_or_default(),
      currency: optional(command.currency, Currency::new)?.unwrap_or_default(),
      items: parse_items(command.items)?,
    };

    let (invoice, items) = self.invoice_service.create_invoice(data).await?;

    let details = InvoiceDetails {
      invoice,
      company: None,
      client: None,
      items,
    };
    Ok(InvoiceView::build(
      &details,
      InvoiceRelations {
        items: true,
        ..Default::default()
      },
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::InMemoryStore;
  use rust_decimal_macros::dec;

  fn item(description: &str, quantity: Decimal, unit_price: Decimal) -> InvoiceItemInput {
    InvoiceItemInput {
      description: description.to_string(),
      quantity,
      unit_price,
    }
  }

  fn setup() -> (InMemoryStore, CreateInvoiceUseCase, Uuid, Uuid) {
    let store = InMemoryStore::default();
    let company = store.seed_company("Servicios Tech SA de CV", "STE850101ABC");
    let client = store.seed_client_for(company.id);
    let use_case = CreateInvoiceUseCase::new(store.invoice_service());
    (store, use_case, company.id, client.id)
  }

  fn command(company_id: Uuid, client_id: Uuid, items: Vec<InvoiceItemInput>) -> CreateInvoiceCommand {
    CreateInvoiceCommand {
      company_id,
      client_id,
      date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
      status: None,
      currency: None,
      items,
    }
  }

  #[tokio::test]
  async fn test_totals_are_computed_from_items() {
    let (_, use_case, company_id, client_id) = setup();

    let view = use_case
      .execute(command(
        company_id,
        client_id,
        vec![
          item("Desarrollo", dec!(1), dec!(10000)),
          item("Soporte", dec!(5), dec!(1000)),
        ],
      ))
      .await
      .unwrap();

    assert_eq!(view.subtotal, dec!(15000));
    assert_eq!(view.tax, dec!(2400));
    assert_eq!(view.total, dec!(17400));
    assert_eq!(view.status, "draft");
    assert_eq!(view.currency, "MXN");
    let items = view.items.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].total, dec!(5000));
  }

  #[tokio::test]
  async fn test_empty_items_persist_nothing() {
    let (store, use_case, company_id, client_id) = setup();

    let result = use_case.execute(command(company_id, client_id, vec![])).await;

    assert!(matches!(result, Err(InvoiceError::NoItems)));
    assert_eq!(store.invoice_count(), 0);
  }

  #[tokio::test]
  async fn test_invalid_item_is_rejected() {
    let (store, use_case, company_id, client_id) = setup();

    let result = use_case
      .execute(command(
        company_id,
        client_id,
        vec![
          item("Desarrollo", dec!(1), dec!(100)),
          item("Gratis", dec!(0), dec!(100)),
        ],
      ))
      .await;

    assert!(matches!(result, Err(InvoiceError::Validation(_))));
    assert_eq!(store.invoice_count(), 0);
  }

  #[tokio::test]
  async fn test_unknown_client_is_not_found() {
    let (store, use_case, company_id, _) = setup();
    let missing = Uuid::new_v4();

    let result = use_case
      .execute(command(company_id, missing, vec![item("A", dec!(1), dec!(1))]))
      .await;

    assert!(matches!(result, Err(InvoiceError::ClientNotFound(id)) if id == missing));
    assert_eq!(store.invoice_count(), 0);
  }

  #[tokio::test]
  async fn test_custom_status_and_currency() {
    let (_, use_case, company_id, client_id) = setup();
    let mut command = command(company_id, client_id, vec![item("A", dec!(2), dec!(50))]);
    command.status = Some("sent".to_string());
    command.currency = Some("usd".to_string());

    let view = use_case.execute(command).await.unwrap();

    assert_eq!(view.status, "sent");
    assert_eq!(view.currency, "USD");
    assert_eq!(view.total, dec!(116));
  }
}
