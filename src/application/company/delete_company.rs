use std::sync::Arc;
use uuid::Uuid;

use crate::domain::company::{CompanyError, CompanyService};

/// Deletes a company that has no clients or invoices
pub struct DeleteCompanyUseCase {
  company_service: Arc<CompanyService>,
}

impl DeleteCompanyUseCase {
  pub fn new(company_service: Arc<CompanyService>) -> Self {
    Self { company_service }
  }

  pub async fn execute(&self, company_id: Uuid) -> Result<(), CompanyError> {
    self.company_service.delete_company(company_id).await
  }
}
