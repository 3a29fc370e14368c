use async_trait::async_trait;
use uuid::Uuid;

use super::{entities::Company, errors::CompanyError, value_objects::TaxId};
use crate::domain::pagination::{Page, PageRequest};

#[async_trait]
pub trait CompanyRepository: Send + Sync {
  /// Inserts a company; a taken tax id yields `CompanyError::TaxIdAlreadyExists`
  async fn create(&self, company: Company) -> Result<Company, CompanyError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError>;
  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, CompanyError>;
  async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Company>, CompanyError>;
  /// Newest first
  async fn list(&self, page: PageRequest) -> Result<Page<Company>, CompanyError>;
  async fn update(&self, company: Company) -> Result<Company, CompanyError>;
  /// True when any client or invoice references the company
  async fn has_dependents(&self, id: Uuid) -> Result<bool, CompanyError>;
  /// Returns false when no row was deleted
  async fn delete(&self, id: Uuid) -> Result<bool, CompanyError>;
}
