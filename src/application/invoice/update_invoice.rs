use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use super::create_invoice::{InvoiceItemInput, parse_items};
use crate::application::views::{InvoiceRelations, InvoiceView};
use crate::domain::invoice::{
  Currency, InvoiceDetails, InvoiceError, InvoiceService, InvoiceStatus, InvoiceUpdate,
};

/// Partial update. With `items` the whole item list is replaced and the
/// totals recomputed; without it the totals stay as they are.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceCommand {
  pub invoice_id: Uuid,
  pub company_id: Option<Uuid>,
  pub client_id: Option<Uuid>,
  pub date: Option<NaiveDate>,
  pub status: Option<String>,
  pub currency: Option<String>,
  pub items: Option<Vec<InvoiceItemInput>>,
}

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: UpdateInvoiceCommand) -> Result<InvoiceView, InvoiceError> {
    let update = InvoiceUpdate {
      company_id: command.company_id,
      client_id: command.client_id,
      date: command.date,
      status: command.status.map(InvoiceStatus::new).transpose()?,
      currency: command.currency.map(Currency::new).transpose()?,
      items: command.items.map(parse_items).transpose()?,
    };

    let (invoice, items) = self
      .invoice_service
      .update_invoice(command.invoice_id, update)
      .await?;

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
