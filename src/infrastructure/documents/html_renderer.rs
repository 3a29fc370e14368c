use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::invoice::{InvoiceDetails, InvoiceError, InvoiceItem};

const TEMPLATE_NAME: &str = "invoices/pdf.html.tera";
const TEMPLATE: &str = include_str!("../../../templates/invoices/pdf.html.tera");

#[derive(Serialize)]
struct PrintedItem {
  description: String,
  quantity: String,
  unit_price: String,
  total: String,
}

#[derive(Serialize)]
struct PrintedInvoice {
  id: String,
  date: String,
  status: String,
  company_name: String,
  company_tax_id: Option<String>,
  company_address: Option<String>,
  client_name: String,
  client_tax_id: Option<String>,
  items: Vec<PrintedItem>,
  subtotal: String,
  tax: String,
  total: String,
}

impl PrintedInvoice {
  fn from_details(details: &InvoiceDetails) -> Self {
    let invoice = &details.invoice;
    let currency = invoice.currency.value();
    let company = details.company.as_ref();
    let client = details.client.as_ref();

    Self {
      id: invoice.id.to_string(),
      date: invoice.date.format("%d/%m/%Y").to_string(),
      status: invoice.status.value().to_string(),
      company_name: company.map(|c| c.name.as_str().to_string()).unwrap_or_default(),
      company_tax_id: company.map(|c| c.tax_id.as_str().to_string()),
      company_address: company
        .and_then(|c| c.address.as_ref())
        .map(|a| a.as_str().to_string()),
      client_name: client.map(|c| c.name.as_str().to_string()).unwrap_or_default(),
      client_tax_id: client
        .and_then(|c| c.tax_id.as_ref())
        .map(|t| t.as_str().to_string()),
      items: details
        .items
        .iter()
        .map(|item| PrintedItem::from_item(item, currency))
        .collect(),
      subtotal: format_money(currency, invoice.subtotal),
      tax: format_money(currency, invoice.tax),
      total: format_money(currency, invoice.total),
    }
  }
}

impl PrintedItem {
  fn from_item(item: &InvoiceItem, currency: &str) -> Self {
    Self {
      description: item.description.value().to_string(),
      quantity: item.quantity.value().normalize().to_string(),
      unit_price: format_money(currency, item.unit_price.value()),
      total: format_money(currency, item.total),
    }
  }
}

/// `MXN 17,400.00`
pub fn format_money(currency: &str, amount: Decimal) -> String {
  let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  let fixed = format!("{:.2}", rounded.abs());
  let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
    "-"
  } else {
    ""
  };

  format!("{} {}{}.{}", currency, sign, grouped, cents)
}

/// Renders invoices into a single HTML document, one page per invoice
pub struct InvoiceHtmlRenderer {
  tera: Tera,
}

impl InvoiceHtmlRenderer {
  pub fn new() -> Result<Self, tera::Error> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html.tera", ".html"]);
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    Ok(Self { tera })
  }

  pub fn render(&self, invoices: &[InvoiceDetails]) -> Result<String, InvoiceError> {
    let printed: Vec<PrintedInvoice> = invoices.iter().map(PrintedInvoice::from_details).collect();

    let mut context = Context::new();
    context.insert("invoices", &printed);

    self
      .tera
      .render(TEMPLATE_NAME, &context)
      .map_err(|e| InvoiceError::PdfGenerationFailed(format!("template rendering failed: {}", e)))
  }
}
