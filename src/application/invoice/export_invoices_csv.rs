use chrono::Utc;
use std::sync::Arc;

use super::exported_document::{ExportedDocument, parse_invoice_ids};
use crate::domain::invoice::{CsvExporter, InvoiceError, InvoiceService};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=UTF-8";

/// Exports the requested invoices as CSV. Unknown ids produce a
/// header-only document.
pub struct ExportInvoicesCsvUseCase {
  invoice_service: Arc<InvoiceService>,
  exporter: Arc<dyn CsvExporter>,
}

impl ExportInvoicesCsvUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, exporter: Arc<dyn CsvExporter>) -> Self {
    Self {
      invoice_service,
      exporter,
    }
  }

  pub async fn execute(&self, ids: Vec<String>) -> Result<ExportedDocument, InvoiceError> {
    let ids = parse_invoice_ids(&ids)?;

    let invoices = self.invoice_service.load_for_export(&ids).await?;
    let body = self.exporter.export(&invoices)?;

    tracing::info!(requested = ids.len(), exported = invoices.len(), "Exported invoices to CSV");

    Ok(ExportedDocument {
      filename: format!("facturas-{}.csv", Utc::now().format("%Y-%m-%d-%H%M%S")),
      content_type: CSV_CONTENT_TYPE,
      body,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{Currency, InvoiceStatus, NewInvoice};
  use crate::infrastructure::documents::CsvInvoiceExporter;
  use crate::test_utils::{InMemoryStore, line};
  use rust_decimal_macros::dec;
  use uuid::Uuid;

  fn use_case(store: &InMemoryStore) -> ExportInvoicesCsvUseCase {
    ExportInvoicesCsvUseCase::new(store.invoice_service(), Arc::new(CsvInvoiceExporter::new()))
  }

  fn body_lines(document: &ExportedDocument) -> Vec<String> {
    String::from_utf8_lossy(&document.body)
      .trim_start_matches('\u{feff}')
      .lines()
      .map(str::to_string)
      .collect()
  }

  #[tokio::test]
  async fn test_no_ids_is_a_validation_error() {
    let result = use_case(&InMemoryStore::default()).execute(vec![]).await;

    assert!(matches!(result, Err(InvoiceError::MissingInvoiceIds)));
  }

  #[tokio::test]
  async fn test_unknown_ids_yield_header_only() {
    let document = use_case(&InMemoryStore::default())
      .execute(vec![Uuid::new_v4().to_string()])
      .await
      .unwrap();

    assert_eq!(body_lines(&document).len(), 1);
    assert_eq!(document.content_type, "text/csv; charset=UTF-8");
    assert!(document.filename.starts_with("facturas-"));
    assert!(document.filename.ends_with(".csv"));
    assert_eq!(document.filename.len(), "facturas-2024-01-15-103000.csv".len());
  }

  #[tokio::test]
  async fn test_rows_for_found_invoices_in_creation_order() {
    let store = InMemoryStore::default();
    let company = store.seed_company("Servicios Tech SA de CV", "STE850101ABC");
    let client = store.seed_client_for(company.id);
    let service = store.invoice_service();
    let mut ids = Vec::new();
    for price in [dec!(100), dec!(200)] {
      let (invoice, _) = service
        .create_invoice(NewInvoice {
          company_id: company.id,
          client_id: client.id,
          date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
          status: InvoiceStatus::default(),
          currency: Currency::default(),
          items: vec![line("Servicio", dec!(1), price)],
        })
        .await
        .unwrap();
      ids.push(invoice.id);
    }

    let document = use_case(&store)
      .execute(vec![
        ids[1].to_string(),
        Uuid::new_v4().to_string(),
        ids[0].to_string(),
      ])
      .await
      .unwrap();
    let lines = body_lines(&document);

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with(&ids[0].to_string()));
    assert!(lines[2].starts_with(&ids[1].to_string()));
    assert!(lines[1].ends_with(";100;16.00;116.00;MXN"));
  }
}
