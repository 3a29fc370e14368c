pub mod auth;
pub mod clients;
pub mod companies;
pub mod invoices;
