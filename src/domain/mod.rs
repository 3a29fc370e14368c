pub mod auth;
pub mod company;
pub mod errors;
pub mod invoice;
pub mod pagination;

pub use errors::RepositoryError;
pub use pagination::{Page, PageMeta, PageRequest};
