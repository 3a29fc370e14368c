mod csv_exporter;
mod html_renderer;
mod wkhtmltopdf_generator;

pub use csv_exporter::CsvInvoiceExporter;
pub use html_renderer::{InvoiceHtmlRenderer, format_money};
pub use wkhtmltopdf_generator::WkHtmlToPdfGenerator;
