use async_trait::async_trait;
use uuid::Uuid;

use super::{
  entities::{Client, Invoice, InvoiceDetails, InvoiceItem},
  errors::InvoiceError,
};
use crate::domain::pagination::{Page, PageRequest};

#[async_trait]
pub trait ClientRepository: Send + Sync {
  async fn create(&self, client: Client) -> Result<Client, InvoiceError>;
  async fn update(&self, client: Client) -> Result<Client, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, InvoiceError>;
  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Client>, InvoiceError>;
  /// Newest first
  async fn list(&self, page: PageRequest) -> Result<Page<Client>, InvoiceError>;
  async fn has_invoices(&self, id: Uuid) -> Result<bool, InvoiceError>;
  /// Returns false when no row was deleted
  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError>;
}

/// Invoice persistence. Every write that touches items runs in a single
/// transaction together with the header.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Inserts the header and all items atomically
  async fn create(
    &self,
    invoice: Invoice,
    items: Vec<InvoiceItem>,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError>;

  /// Writes the header. With `Some(items)` every existing item is deleted
  /// and the new set inserted in the same transaction, together with the
  /// invoice's totals. With `None` the stored totals are left as they are.
  async fn update(
    &self,
    invoice: Invoice,
    items: Option<Vec<InvoiceItem>>,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError>;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;

  /// Matching invoices in creation order; unknown ids are skipped
  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Invoice>, InvoiceError>;

  /// Newest first
  async fn list(&self, page: PageRequest) -> Result<Page<Invoice>, InvoiceError>;

  /// Items of one invoice by position
  async fn find_items(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, InvoiceError>;

  /// Items of several invoices, grouped by invoice and ordered by position
  async fn find_items_for(&self, invoice_ids: &[Uuid]) -> Result<Vec<InvoiceItem>, InvoiceError>;

  /// Deletes the items and the header atomically. Returns false when the
  /// invoice did not exist.
  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError>;
}

/// Renders fully loaded invoices into a PDF, one page per invoice
#[async_trait]
pub trait PdfGenerator: Send + Sync {
  async fn generate(&self, invoices: &[InvoiceDetails]) -> Result<Vec<u8>, InvoiceError>;
}

/// Writes fully loaded invoices as a CSV document
pub trait CsvExporter: Send + Sync {
  fn export(&self, invoices: &[InvoiceDetails]) -> Result<Vec<u8>, InvoiceError>;
}
