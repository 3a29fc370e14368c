use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::value_objects::Email;
use crate::domain::company::{
  PartyName, PersonType, PhoneNumber, PostalAddress, TaxId, ValidationError,
};
use crate::domain::invoice::{Client, ClientRepository, InvoiceError};
use crate::domain::errors::FOREIGN_KEY_VIOLATION;
use crate::domain::pagination::{Page, PageRequest};

const CLIENT_COLUMNS: &str =
  "id, company_id, name, tax_id, person_type, email, phone, address, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ClientRow {
  id: Uuid,
  company_id: Option<Uuid>,
  name: String,
  tax_id: Option<String>,
  person_type: String,
  email: Option<String>,
  phone: Option<String>,
  address: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
  type Error = InvoiceError;

  fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
    let email = row
      .email
      .map(Email::new)
      .transpose()
      .map_err(ValidationError::from)?;

    Ok(Client {
      id: row.id,
      company_id: row.company_id,
      name: PartyName::new(row.name)?,
      tax_id: row.tax_id.map(TaxId::new).transpose()?,
      person_type: row.person_type.parse::<PersonType>()?,
      email,
      phone: row.phone.map(PhoneNumber::new).transpose()?,
      address: row.address.map(PostalAddress::new).transpose()?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

/// An unknown company_id surfaces as a foreign key violation
fn map_write_error(e: sqlx::Error, client: &Client) -> InvoiceError {
  if let sqlx::Error::Database(db_err) = &e {
    if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
      if let Some(company_id) = client.company_id {
        return InvoiceError::CompanyNotFound(company_id);
      }
    }
  }
  InvoiceError::Database(e)
}

pub struct PostgresClientRepository {
  pool: PgPool,
}

impl PostgresClientRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
  async fn create(&self, client: Client) -> Result<Client, InvoiceError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            INSERT INTO clients ({CLIENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CLIENT_COLUMNS}
            "#
    ))
    .bind(client.id)
    .bind(client.company_id)
    .bind(client.name.as_str())
    .bind(client.tax_id.as_ref().map(|t| t.as_str()))
    .bind(client.person_type.as_str())
    .bind(client.email.as_ref().map(|e| e.as_str()))
    .bind(client.phone.as_ref().map(|p| p.as_str()))
    .bind(client.address.as_ref().map(|a| a.as_str()))
    .bind(client.created_at)
    .bind(client.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| map_write_error(e, &client))?;

    row.try_into()
  }

  async fn update(&self, client: Client) -> Result<Client, InvoiceError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            UPDATE clients
            SET company_id = $2, name = $3, tax_id = $4, person_type = $5, email = $6,
                phone = $7, address = $8, updated_at = $9
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
    ))
    .bind(client.id)
    .bind(client.company_id)
    .bind(client.name.as_str())
    .bind(client.tax_id.as_ref().map(|t| t.as_str()))
    .bind(client.person_type.as_str())
    .bind(client.email.as_ref().map(|e| e.as_str()))
    .bind(client.phone.as_ref().map(|p| p.as_str()))
    .bind(client.address.as_ref().map(|a| a.as_str()))
    .bind(client.updated_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| map_write_error(e, &client))?;

    row.ok_or(InvoiceError::ClientNotFound(client.id))?.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, InvoiceError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(TryInto::try_into).transpose()
  }

  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Client>, InvoiceError> {
    let rows = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
  }

  async fn list(&self, page: PageRequest) -> Result<Page<Client>, InvoiceError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients")
      .fetch_one(&self.pool)
      .await?;

    let rows = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&self.pool)
    .await?;

    let clients = rows
      .into_iter()
      .map(TryInto::try_into)
      .collect::<Result<Vec<Client>, _>>()?;

    Ok(Page::new(clients, page, total))
  }

  async fn has_invoices(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let has_invoices = sqlx::query_scalar::<_, bool>(
      "SELECT EXISTS (SELECT 1 FROM invoices WHERE client_id = $1)",
    )
    .bind(id)
    .fetch_one(&self.pool)
    .await?;

    Ok(has_invoices)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
          InvoiceError::ClientHasInvoices(id)
        }
        _ => InvoiceError::Database(e),
      })?;

    Ok(result.rows_affected() > 0)
  }
}
