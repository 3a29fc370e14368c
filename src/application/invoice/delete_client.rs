use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

/// Deletes a client that has no invoices
pub struct DeleteClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, client_id: Uuid) -> Result<(), InvoiceError> {
    self.invoice_service.delete_client(client_id).await
  }
}
