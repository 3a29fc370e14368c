//! Response view models
//!
//! Each builder takes an entity plus the relations the caller wants
//! embedded. Relations that were not requested are omitted from the JSON.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::auth::User;
use crate::domain::company::{Company, PersonType};
use crate::domain::invoice::{Client, InvoiceDetails, InvoiceItem};
use crate::domain::pagination::{Page, PageMeta};

/// `{ "data": [...], "meta": {...} }`
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
  pub data: Vec<T>,
  pub meta: PageMeta,
}

impl<T> Paginated<T> {
  pub fn from_page<U>(page: Page<U>, view: impl FnMut(U) -> T) -> Self {
    let meta = page.meta();
    Self {
      data: page.items.into_iter().map(view).collect(),
      meta,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
  pub id: Uuid,
  pub name: String,
  pub email: String,
}

impl From<&User> for UserView {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      name: user.name.clone(),
      email: user.email.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
  pub id: Uuid,
  pub name: String,
  pub tax_id: String,
  pub person_type: PersonType,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<&Company> for CompanyView {
  fn from(company: &Company) -> Self {
    Self {
      id: company.id,
      name: company.name.as_str().to_string(),
      tax_id: company.tax_id.as_str().to_string(),
      person_type: company.person_type,
      email: company.email.as_ref().map(|e| e.as_str().to_string()),
      phone: company.phone.as_ref().map(|p| p.as_str().to_string()),
      address: company.address.as_ref().map(|a| a.as_str().to_string()),
      created_at: company.created_at,
      updated_at: company.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientView {
  pub id: Uuid,
  pub company_id: Option<Uuid>,
  pub name: String,
  pub tax_id: Option<String>,
  pub person_type: PersonType,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<CompanyView>,
}

impl ClientView {
  /// `company` is embedded only when `with_company` is set
  pub fn build(client: &Client, company: Option<&Company>, with_company: bool) -> Self {
    Self {
      id: client.id,
      company_id: client.company_id,
      name: client.name.as_str().to_string(),
      tax_id: client.tax_id.as_ref().map(|t| t.as_str().to_string()),
      person_type: client.person_type,
      email: client.email.as_ref().map(|e| e.as_str().to_string()),
      phone: client.phone.as_ref().map(|p| p.as_str().to_string()),
      address: client.address.as_ref().map(|a| a.as_str().to_string()),
      created_at: client.created_at,
      updated_at: client.updated_at,
      company: company.filter(|_| with_company).map(CompanyView::from),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItemView {
  pub id: Uuid,
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
  pub total: Decimal,
}

impl From<&InvoiceItem> for InvoiceItemView {
  fn from(item: &InvoiceItem) -> Self {
    Self {
      id: item.id,
      description: item.description.value().to_string(),
      quantity: item.quantity.value(),
      unit_price: item.unit_price.value(),
      total: item.total,
    }
  }
}

/// Which relations an [`InvoiceView`] embeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceRelations {
  pub company: bool,
  pub client: bool,
  pub items: bool,
}

impl InvoiceRelations {
  pub const ALL: Self = Self {
    company: true,
    client: true,
    items: true,
  };

  /// Company and client, no items
  pub const PARTIES: Self = Self {
    company: true,
    client: true,
    items: false,
  };
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
  pub id: Uuid,
  pub company_id: Uuid,
  pub client_id: Uuid,
  pub date: NaiveDate,
  pub status: String,
  pub currency: String,
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<CompanyView>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub client: Option<ClientView>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub items: Option<Vec<InvoiceItemView>>,
}

impl InvoiceView {
  pub fn build(details: &InvoiceDetails, relations: InvoiceRelations) -> Self {
    let invoice = &details.invoice;
    Self {
      id: invoice.id,
      company_id: invoice.company_id,
      client_id: invoice.client_id,
      date: invoice.date,
      status: invoice.status.value().to_string(),
      currency: invoice.currency.value().to_string(),
      subtotal: invoice.subtotal,
      tax: invoice.tax,
      total: invoice.total,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
      company: details
        .company
        .as_ref()
        .filter(|_| relations.company)
        .map(CompanyView::from),
      client: details
        .client
        .as_ref()
        .filter(|_| relations.client)
        .map(|client| ClientView::build(client, None, false)),
      items: relations
        .items
        .then(|| details.items.iter().map(InvoiceItemView::from).collect()),
    }
  }
}
