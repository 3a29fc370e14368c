use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::invoice::{
  Currency, Invoice, InvoiceError, InvoiceItem, InvoiceRepository, InvoiceStatus,
  ItemDescription, Quantity, UnitPrice,
};
use crate::domain::errors::FOREIGN_KEY_VIOLATION;
use crate::domain::pagination::{Page, PageRequest};

const INVOICE_COLUMNS: &str =
  "id, company_id, client_id, date, status, currency, subtotal, tax, total, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, invoice_id, description, quantity, unit_price, total, position";

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  company_id: Uuid,
  client_id: Uuid,
  date: NaiveDate,
  status: String,
  currency: String,
  subtotal: Decimal,
  tax: Decimal,
  total: Decimal,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    Ok(Invoice {
      id: row.id,
      company_id: row.company_id,
      client_id: row.client_id,
      date: row.date,
      status: InvoiceStatus::new(row.status)?,
      currency: Currency::new(row.currency)?,
      subtotal: row.subtotal,
      tax: row.tax,
      total: row.total,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct InvoiceItemRow {
  id: Uuid,
  invoice_id: Uuid,
  description: String,
  quantity: Decimal,
  unit_price: Decimal,
  total: Decimal,
  position: i32,
}

impl TryFrom<InvoiceItemRow> for InvoiceItem {
  type Error = InvoiceError;

  fn try_from(row: InvoiceItemRow) -> Result<Self, Self::Error> {
    Ok(InvoiceItem {
      id: row.id,
      invoice_id: row.invoice_id,
      description: ItemDescription::new(row.description)?,
      quantity: Quantity::new(row.quantity)?,
      unit_price: UnitPrice::new(row.unit_price)?,
      total: row.total,
      position: row.position,
    })
  }
}

/// Foreign key violations on the header name the missing party
fn map_write_error(e: sqlx::Error, invoice: &Invoice) -> InvoiceError {
  if let sqlx::Error::Database(db_err) = &e {
    if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
      match db_err.constraint() {
        Some("invoices_company_id_fkey") => {
          return InvoiceError::CompanyNotFound(invoice.company_id);
        }
        Some("invoices_client_id_fkey") => return InvoiceError::ClientNotFound(invoice.client_id),
        _ => {}
      }
    }
  }
  InvoiceError::Database(e)
}

async fn insert_items(
  conn: &mut PgConnection,
  items: &[InvoiceItem],
) -> Result<Vec<InvoiceItem>, InvoiceError> {
  let mut saved = Vec::with_capacity(items.len());

  for item in items {
    let row = sqlx::query_as::<_, InvoiceItemRow>(&format!(
      r#"
            INSERT INTO invoice_items ({ITEM_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ITEM_COLUMNS}
            "#
    ))
    .bind(item.id)
    .bind(item.invoice_id)
    .bind(item.description.value())
    .bind(item.quantity.value())
    .bind(item.unit_price.value())
    .bind(item.total)
    .bind(item.position)
    .fetch_one(&mut *conn)
    .await?;

    saved.push(row.try_into()?);
  }

  Ok(saved)
}

async fn select_items(
  conn: &mut PgConnection,
  invoice_id: Uuid,
) -> Result<Vec<InvoiceItem>, InvoiceError> {
  let rows = sqlx::query_as::<_, InvoiceItemRow>(&format!(
    "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = $1 ORDER BY position"
  ))
  .bind(invoice_id)
  .fetch_all(&mut *conn)
  .await?;

  rows.into_iter().map(TryInto::try_into).collect()
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(
    &self,
    invoice: Invoice,
    items: Vec<InvoiceItem>,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError> {
    let mut tx = self.pool.begin().await?;

    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            INSERT INTO invoices ({INVOICE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {INVOICE_COLUMNS}
            "#
    ))
    .bind(invoice.id)
    .bind(invoice.company_id)
    .bind(invoice.client_id)
    .bind(invoice.date)
    .bind(invoice.status.value())
    .bind(invoice.currency.value())
    .bind(invoice.subtotal)
    .bind(invoice.tax)
    .bind(invoice.total)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_write_error(e, &invoice))?;

    let saved_items = insert_items(&mut tx, &items).await?;

    tx.commit().await?;

    Ok((row.try_into()?, saved_items))
  }

  async fn update(
    &self,
    invoice: Invoice,
    items: Option<Vec<InvoiceItem>>,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError> {
    let mut tx = self.pool.begin().await?;

    // Concurrent updates of the same invoice serialize on this row lock
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM invoices WHERE id = $1 FOR UPDATE")
      .bind(invoice.id)
      .fetch_optional(&mut *tx)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice.id))?;

    let (row, saved_items) = match items {
      Some(items) => {
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
          .bind(invoice.id)
          .execute(&mut *tx)
          .await?;
        let saved_items = insert_items(&mut tx, &items).await?;

        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
          r#"
            UPDATE invoices
            SET company_id = $2, client_id = $3, date = $4, status = $5, currency = $6,
                subtotal = $7, tax = $8, total = $9, updated_at = $10
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice.id)
        .bind(invoice.company_id)
        .bind(invoice.client_id)
        .bind(invoice.date)
        .bind(invoice.status.value())
        .bind(invoice.currency.value())
        .bind(invoice.subtotal)
        .bind(invoice.tax)
        .bind(invoice.total)
        .bind(invoice.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &invoice))?;

        (row, saved_items)
      }
      None => {
        // Totals belong to the persisted items, never to the caller's copy
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
          r#"
            UPDATE invoices
            SET company_id = $2, client_id = $3, date = $4, status = $5, currency = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice.id)
        .bind(invoice.company_id)
        .bind(invoice.client_id)
        .bind(invoice.date)
        .bind(invoice.status.value())
        .bind(invoice.currency.value())
        .bind(invoice.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &invoice))?;

        (row, select_items(&mut tx, invoice.id).await?)
      }
    };

    tx.commit().await?;

    Ok((row.try_into()?, saved_items))
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(TryInto::try_into).transpose()
  }

  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE id = ANY($1)
            ORDER BY created_at, id
            "#
    ))
    .bind(ids)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
  }

  async fn list(&self, page: PageRequest) -> Result<Page<Invoice>, InvoiceError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
      .fetch_one(&self.pool)
      .await?;

    let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&self.pool)
    .await?;

    let invoices = rows
      .into_iter()
      .map(TryInto::try_into)
      .collect::<Result<Vec<Invoice>, _>>()?;

    Ok(Page::new(invoices, page, total))
  }

  async fn find_items(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, InvoiceError> {
    let mut conn = self.pool.acquire().await?;
    select_items(&mut conn, invoice_id).await
  }

  async fn find_items_for(&self, invoice_ids: &[Uuid]) -> Result<Vec<InvoiceItem>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceItemRow>(&format!(
      r#"
            SELECT {ITEM_COLUMNS}
            FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY invoice_id, position
            "#
    ))
    .bind(invoice_ids)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await?;

    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
  }
}
