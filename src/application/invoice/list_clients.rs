use std::sync::Arc;

use crate::application::views::{ClientView, Paginated};
use crate::domain::invoice::{InvoiceError, InvoiceService};
use crate::domain::pagination::PageRequest;

/// Newest first, each client with its company
pub struct ListClientsUseCase {
  invoice_service: Arc<InvoiceService>,
  per_page: u32,
}

impl ListClientsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, per_page: u32) -> Self {
    Self {
      invoice_service,
      per_page,
    }
  }

  pub async fn execute(&self, page: Option<u32>) -> Result<Paginated<ClientView>, InvoiceError> {
    let page = self
      .invoice_service
      .list_clients(PageRequest::new(page, self.per_page))
      .await?;

    Ok(Paginated::from_page(page, |(client, company)| {
      ClientView::build(&client, company.as_ref(), true)
    }))
  }
}
