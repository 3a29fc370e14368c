use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

/// Deletes an invoice together with its items
pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<(), InvoiceError> {
    self.invoice_service.delete_invoice(invoice_id).await
  }
}
