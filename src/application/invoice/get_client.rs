use std::sync::Arc;
use uuid::Uuid;

use crate::application::views::ClientView;
use crate::domain::invoice::{InvoiceError, InvoiceService};

/// Client with its company embedded
pub struct GetClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, client_id: Uuid) -> Result<ClientView, InvoiceError> {
    let (client, company) = self.invoice_service.get_client(client_id).await?;

    Ok(ClientView::build(&client, company.as_ref(), true))
  }
}
