use std::sync::Arc;
use uuid::Uuid;

use crate::application::views::{InvoiceRelations, InvoiceView};
use crate::domain::invoice::{InvoiceError, InvoiceService};

/// Invoice with company, client and items
pub struct GetInvoiceDetailsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<InvoiceView, InvoiceError> {
    let details = self.invoice_service.get_invoice_details(invoice_id).await?;

    Ok(InvoiceView::build(&details, InvoiceRelations::ALL))
  }
}
