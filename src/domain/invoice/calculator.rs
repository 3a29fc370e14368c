//! Invoice totals.
//!
//! `subtotal` is the exact sum of the line totals, `tax` is the subtotal
//! times [`TAX_RATE`] rounded half-up to cents, and `total` is their sum.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use super::errors::InvoiceError;
use super::value_objects::{ItemDescription, Quantity, UnitPrice, ValueObjectError};

/// IVA, applied to every invoice
pub const TAX_RATE: Decimal = dec!(0.16);

/// A validated line of an invoice, before it is persisted
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
  pub description: ItemDescription,
  pub quantity: Quantity,
  pub unit_price: UnitPrice,
  total: Decimal,
}

impl LineItem {
  pub fn new(
    description: impl Into<String>,
    quantity: Decimal,
    unit_price: Decimal,
  ) -> Result<Self, ValueObjectError> {
    let description = ItemDescription::new(description)?;
    let quantity = Quantity::new(quantity)?;
    let unit_price = UnitPrice::new(unit_price)?;
    let total = quantity
      .value()
      .checked_mul(unit_price.value())
      .ok_or_else(|| ValueObjectError::InvalidAmount("Line total is out of range".to_string()))?;

    Ok(Self {
      description,
      quantity,
      unit_price,
      total,
    })
  }

  /// `quantity * unit_price`, exact
  pub fn total(&self) -> Decimal {
    self.total
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
}

impl InvoiceTotals {
  pub fn from_subtotal(subtotal: Decimal) -> Result<Self, InvoiceError> {
    let tax = tax_for(subtotal)?;
    let total = subtotal.checked_add(tax).ok_or_else(out_of_range)?;

    Ok(Self {
      subtotal,
      tax,
      total,
    })
  }
}

/// Computes the totals for a non-empty list of items
pub fn calculate_totals(items: &[LineItem]) -> Result<InvoiceTotals, InvoiceError> {
  if items.is_empty() {
    return Err(InvoiceError::NoItems);
  }

  let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
    sum.checked_add(item.total()).ok_or_else(out_of_range)
  })?;

  InvoiceTotals::from_subtotal(subtotal)
}

/// `round_half_up(subtotal * TAX_RATE, 2)`
pub fn tax_for(subtotal: Decimal) -> Result<Decimal, InvoiceError> {
  let tax = subtotal.checked_mul(TAX_RATE).ok_or_else(out_of_range)?;
  Ok(tax.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn out_of_range() -> InvoiceError {
  InvoiceError::Validation(ValueObjectError::InvalidAmount(
    "Invoice amount is out of range".to_string(),
  ))
}
