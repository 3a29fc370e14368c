use std::sync::Arc;

use crate::application::views::{CompanyView, Paginated};
use crate::domain::company::{CompanyError, CompanyService};
use crate::domain::pagination::PageRequest;

/// Newest first, `per_page` rows per page
pub struct ListCompaniesUseCase {
  company_service: Arc<CompanyService>,
  per_page: u32,
}

impl ListCompaniesUseCase {
  pub fn new(company_service: Arc<CompanyService>, per_page: u32) -> Self {
    Self {
      company_service,
      per_page,
    }
  }

  pub async fn execute(&self, page: Option<u32>) -> Result<Paginated<CompanyView>, CompanyError> {
    let page = self
      .company_service
      .list_companies(PageRequest::new(page, self.per_page))
      .await?;

    Ok(Paginated::from_page(page, |company| CompanyView::from(&company)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{InMemoryStore, organization};

  #[tokio::test]
  async fn test_lists_newest_first_with_meta() {
    let store = InMemoryStore::default();
    let service = Arc::new(CompanyService::new(store.companies()));
    for (name, tax_id) in [
      ("Primera SA", "PRI850101AB1"),
      ("Segunda SA", "SEG850101AB2"),
      ("Tercera SA", "TER850101AB3"),
    ] {
      service.create_company(organization(name, tax_id)).await.unwrap();
    }
    let use_case = ListCompaniesUseCase::new(service, 2);

    let first = use_case.execute(None).await.unwrap();
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.data[0].name, "Tercera SA");
    assert_eq!(first.meta.total, 3);
    assert_eq!(first.meta.last_page, 2);

    let second = use_case.execute(Some(2)).await.unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].name, "Primera SA");
    assert_eq!(second.meta.current_page, 2);
  }
}
