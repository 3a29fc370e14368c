pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Company, CompanyUpdate, NewCompany};
pub use errors::{CompanyError, ValidationError};
pub use ports::CompanyRepository;
pub use services::CompanyService;
pub use value_objects::{PartyName, PersonType, PhoneNumber, PostalAddress, TaxId};
