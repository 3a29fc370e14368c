use std::sync::Arc;

use super::exported_document::{ExportedDocument, parse_invoice_ids};
use crate::domain::invoice::{InvoiceError, InvoiceService, PdfGenerator};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Renders the requested invoices into one PDF, one page each
pub struct ExportInvoicesPdfUseCase {
  invoice_service: Arc<InvoiceService>,
  generator: Arc<dyn PdfGenerator>,
}

impl ExportInvoicesPdfUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, generator: Arc<dyn PdfGenerator>) -> Self {
    Self {
      invoice_service,
      generator,
    }
  }

  /// # Errors
  /// `MissingInvoiceIds` without ids and `NoInvoicesFound` when none of
  /// them exists
  pub async fn execute(&self, ids: Vec<String>) -> Result<ExportedDocument, InvoiceError> {
    let ids = parse_invoice_ids(&ids)?;

    let invoices = self.invoice_service.load_for_export(&ids).await?;
    if invoices.is_empty() {
      return Err(InvoiceError::NoInvoicesFound);
    }

    let body = self.generator.generate(&invoices).await?;

    let filename = match invoices.as_slice() {
      [single] => format!("factura-{}.pdf", single.invoice.id),
      many => {
        let ids: Vec<String> = many.iter().map(|d| d.invoice.id.to_string()).collect();
        format!("facturas-{}.pdf", ids.join("-"))
      }
    };

    Ok(ExportedDocument {
      filename,
      content_type: PDF_CONTENT_TYPE,
      body,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{Currency, InvoiceDetails, InvoiceStatus, NewInvoice};
  use crate::test_utils::{InMemoryStore, line};
  use async_trait::async_trait;
  use rust_decimal_macros::dec;
  use std::sync::Mutex;
  use uuid::Uuid;

  /// Records how many invoices each call received
  #[derive(Default)]
  struct RecordingPdfGenerator {
    calls: Mutex<Vec<usize>>,
  }

  #[async_trait]
  impl PdfGenerator for RecordingPdfGenerator {
    async fn generate(&self, invoices: &[InvoiceDetails]) -> Result<Vec<u8>, InvoiceError> {
      self.calls.lock().unwrap().push(invoices.len());
      Ok(b"%PDF-1.4".to_vec())
    }
  }

  async fn seed(store: &InMemoryStore, count: usize) -> Vec<Uuid> {
    let company = store.seed_company("Servicios Tech SA de CV", "STE850101ABC");
    let client = store.seed_client_for(company.id);
    let service = store.invoice_service();
    let mut ids = Vec::new();
    for _ in 0..count {
      let (invoice, _) = service
        .create_invoice(NewInvoice {
          company_id: company.id,
          client_id: client.id,
          date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
          status: InvoiceStatus::default(),
          currency: Currency::default(),
          items: vec![line("Servicio", dec!(1), dec!(100))],
        })
        .await
        .unwrap();
      ids.push(invoice.id);
    }
    ids
  }

  #[tokio::test]
  async fn test_single_invoice_filename() {
    let store = InMemoryStore::default();
    let ids = seed(&store, 1).await;
    let generator = Arc::new(RecordingPdfGenerator::default());
    let use_case = ExportInvoicesPdfUseCase::new(store.invoice_service(), generator.clone());

    let document = use_case.execute(vec![ids[0].to_string()]).await.unwrap();

    assert_eq!(document.filename, format!("factura-{}.pdf", ids[0]));
    assert_eq!(document.content_type, "application/pdf");
    assert!(document.body.starts_with(b"%PDF"));
    assert_eq!(*generator.calls.lock().unwrap(), vec![1]);
  }

  #[tokio::test]
  async fn test_several_invoices_in_one_document() {
    let store = InMemoryStore::default();
    let ids = seed(&store, 2).await;
    let use_case = ExportInvoicesPdfUseCase::new(
      store.invoice_service(),
      Arc::new(RecordingPdfGenerator::default()),
    );

    let document = use_case
      .execute(vec![ids[1].to_string(), ids[0].to_string()])
      .await
      .unwrap();

    assert_eq!(document.filename, format!("facturas-{}-{}.pdf", ids[0], ids[1]));
  }

  #[tokio::test]
  async fn test_no_matching_invoices_is_not_found() {
    let store = InMemoryStore::default();
    let generator = Arc::new(RecordingPdfGenerator::default());
    let use_case = ExportInvoicesPdfUseCase::new(store.invoice_service(), generator.clone());

    let result = use_case.execute(vec![Uuid::new_v4().to_string()]).await;

    assert!(matches!(result, Err(InvoiceError::NoInvoicesFound)));
    assert!(generator.calls.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_invalid_id_is_rejected() {
    let use_case = ExportInvoicesPdfUseCase::new(
      InMemoryStore::default().invoice_service(),
      Arc::new(RecordingPdfGenerator::default()),
    );

    let result = use_case.execute(vec!["abc".to_string()]).await;

    assert!(matches!(result, Err(InvoiceError::InvalidInvoiceId(_))));
  }
}
