pub mod calculator;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use calculator::{InvoiceTotals, LineItem, TAX_RATE, calculate_totals};
pub use entities::{
  Client, ClientUpdate, Invoice, InvoiceDetails, InvoiceItem, InvoiceUpdate, NewClient, NewInvoice,
};
pub use errors::InvoiceError;
pub use ports::{ClientRepository, CsvExporter, InvoiceRepository, PdfGenerator};
pub use services::{InvoiceService, InvoiceServiceDependencies};
pub use value_objects::{Currency, InvoiceStatus, ItemDescription, Quantity, UnitPrice};
