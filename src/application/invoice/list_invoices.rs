use std::sync::Arc;

use crate::application::views::{InvoiceRelations, InvoiceView, Paginated};
use crate::domain::invoice::{InvoiceError, InvoiceService};
use crate::domain::pagination::PageRequest;

/// Newest first, with company and client
pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
  per_page: u32,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, per_page: u32) -> Self {
    Self {
      invoice_service,
      per_page,
    }
  }

  pub async fn execute(&self, page: Option<u32>) -> Result<Paginated<InvoiceView>, InvoiceError> {
    let page = self
      .invoice_service
      .list_invoices(PageRequest::new(page, self.per_page))
      .await?;

    Ok(Paginated::from_page(page, |details| {
      InvoiceView::build(&details, InvoiceRelations::PARTIES)
    }))
  }
}
