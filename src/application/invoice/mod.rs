//! Client, invoice and export use cases

mod create_client;
mod create_invoice;
mod delete_client;
mod delete_invoice;
mod export_invoices_csv;
mod export_invoices_pdf;
mod exported_document;
mod get_client;
mod get_invoice_details;
mod list_clients;
mod list_invoices;
mod update_client;
mod update_invoice;

pub use create_client::{CreateClientCommand, CreateClientUseCase};
pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceUseCase, InvoiceItemInput};
pub use delete_client::DeleteClientUseCase;
pub use delete_invoice::DeleteInvoiceUseCase;
pub use export_invoices_csv::{CSV_CONTENT_TYPE, ExportInvoicesCsvUseCase};
pub use export_invoices_pdf::{ExportInvoicesPdfUseCase, PDF_CONTENT_TYPE};
pub use exported_document::ExportedDocument;
pub use get_client::GetClientUseCase;
pub use get_invoice_details::GetInvoiceDetailsUseCase;
pub use list_clients::ListClientsUseCase;
pub use list_invoices::ListInvoicesUseCase;
pub use update_client::{UpdateClientCommand, UpdateClientUseCase};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceUseCase};
