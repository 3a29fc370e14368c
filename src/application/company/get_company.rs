use std::sync::Arc;
use uuid::Uuid;

use crate::application::views::CompanyView;
use crate::domain::company::{CompanyError, CompanyService};

pub struct GetCompanyUseCase {
  company_service: Arc<CompanyService>,
}

impl GetCompanyUseCase {
  pub fn new(company_service: Arc<CompanyService>) -> Self {
    Self { company_service }
  }

  pub async fn execute(&self, company_id: Uuid) -> Result<CompanyView, CompanyError> {
    let company = self.company_service.get_company(company_id).await?;

    Ok(CompanyView::from(&company))
  }
}
