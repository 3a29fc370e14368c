pub mod client_repository;
pub mod company_repository;
pub mod invoice_repository;
pub mod session_repository;
pub mod user_repository;

#[cfg(test)]
pub mod test_db;

pub use client_repository::PostgresClientRepository;
pub use company_repository::PostgresCompanyRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use session_repository::PostgresSessionRepository;
pub use user_repository::PostgresUserRepository;
