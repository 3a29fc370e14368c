use uuid::Uuid;

use crate::domain::invoice::InvoiceError;

/// A rendered export ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ExportedDocument {
  pub filename: String,
  pub content_type: &'static str,
  pub body: Vec<u8>,
}

/// Parses the requested ids; blank entries are ignored
pub(crate) fn parse_invoice_ids(ids: &[String]) -> Result<Vec<Uuid>, InvoiceError> {
  let ids: Vec<Uuid> = ids
    .iter()
    .map(|id| id.trim())
    .filter(|id| !id.is_empty())
    .map(|id| Uuid::parse_str(id).map_err(|_| InvoiceError::InvalidInvoiceId(id.to_string())))
    .collect::<Result<_, _>>()?;

  if ids.is_empty() {
    return Err(InvoiceError::MissingInvoiceIds);
  }

  Ok(ids)
}
