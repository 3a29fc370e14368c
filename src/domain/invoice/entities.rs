use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculator::{InvoiceTotals, LineItem};
use super::value_objects::{Currency, InvoiceStatus, ItemDescription, Quantity, UnitPrice};
use crate::domain::auth::value_objects::Email;
use crate::domain::company::{
  Company, PartyName, PersonType, PhoneNumber, PostalAddress, TaxId, ValidationError,
};

// ============================================================================
// Client
// ============================================================================

/// The recipient of invoices, optionally attached to a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
  pub id: Uuid,
  pub company_id: Option<Uuid>,
  pub name: PartyName,
  pub tax_id: Option<TaxId>,
  pub person_type: PersonType,
  pub email: Option<Email>,
  pub phone: Option<PhoneNumber>,
  pub address: Option<PostalAddress>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClient {
  pub company_id: Option<Uuid>,
  pub name: PartyName,
  pub tax_id: Option<TaxId>,
  pub person_type: PersonType,
  pub email: Option<Email>,
  pub phone: Option<PhoneNumber>,
  pub address: Option<PostalAddress>,
}

/// Partial update; `Some(None)` clears a nullable field
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
  pub company_id: Option<Option<Uuid>>,
  pub name: Option<PartyName>,
  pub tax_id: Option<Option<TaxId>>,
  pub person_type: Option<PersonType>,
  pub email: Option<Option<Email>>,
  pub phone: Option<Option<PhoneNumber>>,
  pub address: Option<Option<PostalAddress>>,
}

impl Client {
  pub fn new(data: NewClient) -> Result<Self, ValidationError> {
    if let Some(tax_id) = &data.tax_id {
      tax_id.check_person_type(data.person_type)?;
    }

    let now = Utc::now();
    Ok(Self {
      id: Uuid::new_v4(),
      company_id: data.company_id,
      name: data.name,
      tax_id: data.tax_id,
      person_type: data.person_type,
      email: data.email,
      phone: data.phone,
      address: data.address,
      created_at: now,
      updated_at: now,
    })
  }

  /// Applies a partial update; on error the client is left untouched
  pub fn apply(&mut self, update: ClientUpdate) -> Result<(), ValidationError> {
    let person_type = update.person_type.unwrap_or(self.person_type);
    let tax_id = update.tax_id.unwrap_or_else(|| self.tax_id.clone());
    if let Some(tax_id) = &tax_id {
      tax_id.check_person_type(person_type)?;
    }

    self.person_type = person_type;
    self.tax_id = tax_id;
    if let Some(company_id) = update.company_id {
      self.company_id = company_id;
    }
    if let Some(name) = update.name {
      self.name = name;
    }
    if let Some(email) = update.email {
      self.email = email;
    }
    if let Some(phone) = update.phone {
      self.phone = phone;
    }
    if let Some(address) = update.address {
      self.address = address;
    }
    self.updated_at = Utc::now();

    Ok(())
  }
}

// ============================================================================
// Invoice
// ============================================================================

/// Invoice header. Totals always match the persisted items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub company_id: Uuid,
  pub client_id: Uuid,
  pub date: NaiveDate,
  pub status: InvoiceStatus,
  pub currency: Currency,
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
  pub company_id: Uuid,
  pub client_id: Uuid,
  pub date: NaiveDate,
  pub status: InvoiceStatus,
  pub currency: Currency,
  pub items: Vec<LineItem>,
}

/// Partial update. When `items` is present the item list is replaced
/// and the totals recomputed; otherwise totals stay as they are.
#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
  pub company_id: Option<Uuid>,
  pub client_id: Option<Uuid>,
  pub date: Option<NaiveDate>,
  pub status: Option<InvoiceStatus>,
  pub currency: Option<Currency>,
  pub items: Option<Vec<LineItem>>,
}

impl Invoice {
  pub fn new(
    company_id: Uuid,
    client_id: Uuid,
    date: NaiveDate,
    status: InvoiceStatus,
    currency: Currency,
    totals: InvoiceTotals,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      company_id,
      client_id,
      date,
      status,
      currency,
      subtotal: totals.subtotal,
      tax: totals.tax,
      total: totals.total,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn totals(&self) -> InvoiceTotals {
    InvoiceTotals {
      subtotal: self.subtotal,
      tax: self.tax,
      total: self.total,
    }
  }

  pub fn set_totals(&mut self, totals: InvoiceTotals) {
    self.subtotal = totals.subtotal;
    self.tax = totals.tax;
    self.total = totals.total;
  }
}

// ============================================================================
// Invoice Item
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub description: ItemDescription,
  pub quantity: Quantity,
  pub unit_price: UnitPrice,
  /// `quantity * unit_price`
  pub total: Decimal,
  /// Zero-based insertion order
  pub position: i32,
}

impl InvoiceItem {
  pub fn from_line(invoice_id: Uuid, position: i32, line: LineItem) -> Self {
    let total = line.total();
    Self {
      id: Uuid::new_v4(),
      invoice_id,
      description: line.description,
      quantity: line.quantity,
      unit_price: line.unit_price,
      total,
      position,
    }
  }

  /// Materializes a list of lines in order
  pub fn from_lines(invoice_id: Uuid, lines: Vec<LineItem>) -> Vec<Self> {
    lines
      .into_iter()
      .zip(0..)
      .map(|(line, position)| Self::from_line(invoice_id, position, line))
      .collect()
  }
}

/// An invoice with its relations resolved
#[derive(Debug, Clone)]
pub struct InvoiceDetails {
  pub invoice: Invoice,
  pub company: Option<Company>,
  pub client: Option<Client>,
  pub items: Vec<InvoiceItem>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::calculator::calculate_totals;
  use rust_decimal_macros::dec;

  fn new_client(tax_id: Option<&str>, person_type: PersonType) -> NewClient {
    NewClient {
      company_id: None,
      name: PartyName::new("Distribuidora Norte SA").unwrap(),
      tax_id: tax_id.map(|t| TaxId::new(t).unwrap()),
      person_type,
      email: None,
      phone: None,
      address: None,
    }
  }

  #[test]
  fn test_client_tax_id_is_optional() {
    assert!(Client::new(new_client(None, PersonType::Individual)).is_ok());
  }

  #[test]
  fn test_client_tax_id_must_match_person_type() {
    assert!(Client::new(new_client(Some("DNS900101XYZ"), PersonType::Organization)).is_ok());
    assert!(Client::new(new_client(Some("DNS900101XYZ"), PersonType::Individual)).is_err());
  }

  #[test]
  fn test_client_update_can_clear_fields() {
    let mut client = Client::new(new_client(Some("DNS900101XYZ"), PersonType::Organization)).unwrap();
    client.company_id = Some(Uuid::new_v4());

    client
      .apply(ClientUpdate {
        company_id: Some(None),
        tax_id: Some(None),
        person_type: Some(PersonType::Individual),
        ..Default::default()
      })
      .unwrap();

    assert!(client.company_id.is_none());
    assert!(client.tax_id.is_none());
    assert_eq!(client.person_type, PersonType::Individual);
  }

  #[test]
  fn test_items_keep_input_order_and_totals() {
    let lines = vec![
      LineItem::new("Desarrollo", dec!(1), dec!(10000)).unwrap(),
      LineItem::new("Soporte", dec!(5), dec!(1000)).unwrap(),
    ];
    let totals = calculate_totals(&lines).unwrap();
    let invoice = Invoice::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
      InvoiceStatus::default(),
      Currency::default(),
      totals,
    );

    let items = InvoiceItem::from_lines(invoice.id, lines);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].position, 0);
    assert_eq!(items[1].position, 1);
    assert_eq!(items[1].total, dec!(5000));
    assert_eq!(invoice.totals(), totals);
    assert!(items.iter().all(|i| i.invoice_id == invoice.id));
  }
}
