pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  AuthResponse, DataResponse, ErrorResponse, LoginRequest, PageQuery, RegisterRequest,
  SuccessResponse, UserResponse,
};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{
  AuthMiddleware, AuthenticatedUser, RequestId, RequestIdMiddleware,
};
pub use routes::{
  ApiRouteDependencies, AuthUseCases, ClientUseCases, CompanyUseCases, InvoiceUseCases,
  configure_api_routes, configure_auth_routes, configure_client_routes, configure_company_routes,
  configure_invoice_routes,
};
