use csv::WriterBuilder;
use serde::Serialize;

use crate::domain::invoice::{CsvExporter, InvoiceDetails, InvoiceError};

/// UTF-8 byte order mark so spreadsheet tools pick the right encoding
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 9] = [
  "ID", "Fecha", "Estado", "Empresa", "Cliente", "Subtotal", "IVA", "Total", "Moneda",
];

#[derive(Serialize)]
struct CsvRow<'a> {
  id: String,
  date: String,
  status: &'a str,
  company: &'a str,
  client: &'a str,
  subtotal: String,
  tax: String,
  total: String,
  currency: &'a str,
}

impl<'a> From<&'a InvoiceDetails> for CsvRow<'a> {
  fn from(details: &'a InvoiceDetails) -> Self {
    let invoice = &details.invoice;
    Self {
      id: invoice.id.to_string(),
      date: invoice.date.format("%Y-%m-%d").to_string(),
      status: invoice.status.value(),
      company: details.company.as_ref().map_or("", |c| c.name.as_str()),
      client: details.client.as_ref().map_or("", |c| c.name.as_str()),
      subtotal: invoice.subtotal.to_string(),
      tax: invoice.tax.to_string(),
      total: invoice.total.to_string(),
      currency: invoice.currency.value(),
    }
  }
}

/// Semicolon separated export, one row per invoice in the given order.
/// Totals are written exactly as persisted.
#[derive(Debug, Default, Clone)]
pub struct CsvInvoiceExporter;

impl CsvInvoiceExporter {
  pub fn new() -> Self {
    Self
  }
}

impl CsvExporter for CsvInvoiceExporter {
  fn export(&self, invoices: &[InvoiceDetails]) -> Result<Vec<u8>, InvoiceError> {
    let mut buffer = Vec::with_capacity(UTF8_BOM.len() + 128 * (invoices.len() + 1));
    buffer.extend_from_slice(UTF8_BOM);

    let mut writer = WriterBuilder::new()
      .delimiter(b';')
      .has_headers(false)
      .from_writer(buffer);

    // Written by hand so an empty export still carries the header
    writer
      .write_record(HEADER)
      .map_err(|e| InvoiceError::CsvExportFailed(e.to_string()))?;

    for details in invoices {
      writer
        .serialize(CsvRow::from(details))
        .map_err(|e| InvoiceError::CsvExportFailed(e.to_string()))?;
    }

    writer
      .into_inner()
      .map_err(|e| InvoiceError::CsvExportFailed(e.to_string()))
  }
}
