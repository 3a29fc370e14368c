use std::sync::Arc;
use uuid::Uuid;

use super::{
  entities::{Company, CompanyUpdate, NewCompany},
  errors::CompanyError,
  ports::CompanyRepository,
};
use crate::domain::pagination::{Page, PageRequest};

/// Company management
pub struct CompanyService {
  company_repo: Arc<dyn CompanyRepository>,
}

impl CompanyService {
  pub fn new(company_repo: Arc<dyn CompanyRepository>) -> Self {
    Self { company_repo }
  }

  pub async fn create_company(&self, data: NewCompany) -> Result<Company, CompanyError> {
    if self.company_repo.find_by_tax_id(&data.tax_id).await?.is_some() {
      return Err(CompanyError::TaxIdAlreadyExists(data.tax_id.into_inner()));
    }

    let company = Company::new(data)?;
    let created = self.company_repo.create(company).await?;

    tracing::info!(company_id = %created.id, "Company created");

    Ok(created)
  }

  pub async fn get_company(&self, id: Uuid) -> Result<Company, CompanyError> {
    self
      .company_repo
      .find_by_id(id)
      .await?
      .ok_or(CompanyError::NotFound(id))
  }

  pub async fn list_companies(&self, page: PageRequest) -> Result<Page<Company>, CompanyError> {
    self.company_repo.list(page).await
  }

  pub async fn update_company(
    &self,
    id: Uuid,
    update: CompanyUpdate,
  ) -> Result<Company, CompanyError> {
    let mut company = self.get_company(id).await?;

    if let Some(tax_id) = &update.tax_id {
      if let Some(other) = self.company_repo.find_by_tax_id(tax_id).await? {
        if other.id != id {
          return Err(CompanyError::TaxIdAlreadyExists(tax_id.as_str().to_string()));
        }
      }
    }

    company.apply(update)?;

    self.company_repo.update(company).await
  }

  /// Deletes a company without clients or invoices
  pub async fn delete_company(&self, id: Uuid) -> Result<(), CompanyError> {
    if self.company_repo.has_dependents(id).await? {
      return Err(CompanyError::HasDependents(id));
    }

    if !self.company_repo.delete(id).await? {
      return Err(CompanyError::NotFound(id));
    }

    tracing::info!(company_id = %id, "Company deleted");

    Ok(())
  }
}
