use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::value_objects::Email;
use crate::domain::company::{
  Company, CompanyError, CompanyRepository, PartyName, PersonType, PhoneNumber, PostalAddress,
  TaxId, ValidationError,
};
use crate::domain::errors::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::domain::pagination::{Page, PageRequest};

const COMPANY_COLUMNS: &str =
  "id, name, tax_id, person_type, email, phone, address, created_at, updated_at";

const TAX_ID_UNIQUE_CONSTRAINT: &str = "companies_tax_id_key";

#[derive(Debug, FromRow)]
struct CompanyRow {
  id: Uuid,
  name: String,
  tax_id: String,
  person_type: String,
  email: Option<String>,
  phone: Option<String>,
  address: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
  type Error = CompanyError;

  fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
    let email = row
      .email
      .map(Email::new)
      .transpose()
      .map_err(ValidationError::from)?;

    Ok(Company {
      id: row.id,
      name: PartyName::new(row.name)?,
      tax_id: TaxId::new(row.tax_id)?,
      person_type: row.person_type.parse::<PersonType>()?,
      email,
      phone: row.phone.map(PhoneNumber::new).transpose()?,
      address: row.address.map(PostalAddress::new).transpose()?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

/// Maps a duplicate tax id onto the domain conflict, everything else
/// onto a repository error
fn map_write_error(e: sqlx::Error, company: &Company) -> CompanyError {
  if let sqlx::Error::Database(db_err) = &e {
    if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
      && db_err.constraint() == Some(TAX_ID_UNIQUE_CONSTRAINT)
    {
      return CompanyError::TaxIdAlreadyExists(company.tax_id.as_str().to_string());
    }
  }
  CompanyError::from(e)
}

pub struct PostgresCompanyRepository {
  pool: PgPool,
}

impl PostgresCompanyRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
  async fn create(&self, company: Company) -> Result<Company, CompanyError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      r#"
            INSERT INTO companies ({COMPANY_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COMPANY_COLUMNS}
            "#
    ))
    .bind(company.id)
    .bind(company.name.as_str())
    .bind(company.tax_id.as_str())
    .bind(company.person_type.as_str())
    .bind(company.email.as_ref().map(|e| e.as_str()))
    .bind(company.phone.as_ref().map(|p| p.as_str()))
    .bind(company.address.as_ref().map(|a| a.as_str()))
    .bind(company.created_at)
    .bind(company.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| map_write_error(e, &company))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(TryInto::try_into).transpose()
  }

  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, CompanyError> {
    let rows = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
  }

  async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Company>, CompanyError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {COMPANY_COLUMNS} FROM companies WHERE tax_id = $1"
    ))
    .bind(tax_id.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(TryInto::try_into).transpose()
  }

  async fn list(&self, page: PageRequest) -> Result<Page<Company>, CompanyError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
      .fetch_one(&self.pool)
      .await?;

    let rows = sqlx::query_as::<_, CompanyRow>(&format!(
      r#"
            SELECT {COMPANY_COLUMNS}
            FROM companies
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&self.pool)
    .await?;

    let companies = rows
      .into_iter()
      .map(TryInto::try_into)
      .collect::<Result<Vec<Company>, _>>()?;

    Ok(Page::new(companies, page, total))
  }

  async fn update(&self, company: Company) -> Result<Company, CompanyError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      r#"
            UPDATE companies
            SET name = $2, tax_id = $3, person_type = $4, email = $5, phone = $6,
                address = $7, updated_at = $8
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
    ))
    .bind(company.id)
    .bind(company.name.as_str())
    .bind(company.tax_id.as_str())
    .bind(company.person_type.as_str())
    .bind(company.email.as_ref().map(|e| e.as_str()))
    .bind(company.phone.as_ref().map(|p| p.as_str()))
    .bind(company.address.as_ref().map(|a| a.as_str()))
    .bind(company.updated_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| map_write_error(e, &company))?;

    row
      .ok_or(CompanyError::NotFound(company.id))?
      .try_into()
  }

  async fn has_dependents(&self, id: Uuid) -> Result<bool, CompanyError> {
    let has_dependents = sqlx::query_scalar::<_, bool>(
      r#"
            SELECT EXISTS (SELECT 1 FROM clients WHERE company_id = $1)
                OR EXISTS (SELECT 1 FROM invoices WHERE company_id = $1)
            "#,
    )
    .bind(id)
    .fetch_one(&self.pool)
    .await?;

    Ok(has_dependents)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, CompanyError> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| match &e {
        // A dependent row appeared after the has_dependents check
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
          CompanyError::HasDependents(id)
        }
        _ => CompanyError::from(e),
      })?;

    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_db::setup_test_db;
  use crate::test_utils::organization;

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_create_find_and_list() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCompanyRepository::new(pool);

    let first = repo
      .create(Company::new(organization("Servicios Tech SA de CV", "STE850101ABC")).unwrap())
      .await
      .unwrap();
    let second = repo
      .create(Company::new(organization("Consultores Asociados SC", "CAS950101GHI")).unwrap())
      .await
      .unwrap();

    let found = repo.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(found.name.as_str(), "Servicios Tech SA de CV");
    assert_eq!(found.person_type, PersonType::Organization);

    let page = repo.list(PageRequest::new(Some(1), 1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.last_page(), 2);
    assert_eq!(page.items[0].id, second.id);

    let both = repo.find_by_ids(&[first.id, second.id]).await.unwrap();
    assert_eq!(both.len(), 2);
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_duplicate_tax_id_maps_to_conflict() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCompanyRepository::new(pool);

    repo
      .create(Company::new(organization("First", "STE850101ABC")).unwrap())
      .await
      .unwrap();
    let result = repo
      .create(Company::new(organization("Second", "STE850101ABC")).unwrap())
      .await;

    assert!(matches!(result, Err(CompanyError::TaxIdAlreadyExists(_))));
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_delete_reports_missing_rows() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCompanyRepository::new(pool);
    let company = repo
      .create(Company::new(organization("First", "STE850101ABC")).unwrap())
      .await
      .unwrap();

    assert!(!repo.has_dependents(company.id).await.unwrap());
    assert!(repo.delete(company.id).await.unwrap());
    assert!(!repo.delete(company.id).await.unwrap());
  }
}
