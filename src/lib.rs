//! Facturo: invoicing administration backend.
//!
//! Companies issue invoices to clients; each invoice carries line items whose
//! totals (subtotal, 16% IVA, total) are computed once and persisted. Invoices
//! can be exported as PDF (one page each) or as a CSV summary.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;
