//! Company use cases

mod create_company;
mod delete_company;
mod get_company;
mod list_companies;
mod update_company;

pub use create_company::{CreateCompanyCommand, CreateCompanyUseCase};
pub use delete_company::DeleteCompanyUseCase;
pub use get_company::GetCompanyUseCase;
pub use list_companies::ListCompaniesUseCase;
pub use update_company::{UpdateCompanyCommand, UpdateCompanyUseCase};
