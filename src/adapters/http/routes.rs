use actix_web::{HttpRequest, error, web};
use std::sync::Arc;

use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
};
use crate::application::company::{
  CreateCompanyUseCase, DeleteCompanyUseCase, GetCompanyUseCase, ListCompaniesUseCase,
  UpdateCompanyUseCase,
};
use crate::application::invoice::{
  CreateClientUseCase, CreateInvoiceUseCase, DeleteClientUseCase, DeleteInvoiceUseCase,
  ExportInvoicesCsvUseCase, ExportInvoicesPdfUseCase, GetClientUseCase, GetInvoiceDetailsUseCase,
  ListClientsUseCase, ListInvoicesUseCase, UpdateClientUseCase, UpdateInvoiceUseCase,
};

use super::errors::ApiError;
use super::handlers::{auth, clients, companies, invoices};
use super::middleware::AuthMiddleware;

#[derive(Clone)]
pub struct AuthUseCases {
  pub register: Arc<RegisterUserUseCase>,
  pub login: Arc<LoginUserUseCase>,
  pub logout: Arc<LogoutUserUseCase>,
  pub current_user: Arc<GetCurrentUserUseCase>,
}

#[derive(Clone)]
pub struct CompanyUseCases {
  pub create: Arc<CreateCompanyUseCase>,
  pub list: Arc<ListCompaniesUseCase>,
  pub get: Arc<GetCompanyUseCase>,
  pub update: Arc<UpdateCompanyUseCase>,
  pub delete: Arc<DeleteCompanyUseCase>,
}

#[derive(Clone)]
pub struct ClientUseCases {
  pub create: Arc<CreateClientUseCase>,
  pub list: Arc<ListClientsUseCase>,
  pub get: Arc<GetClientUseCase>,
  pub update: Arc<UpdateClientUseCase>,
  pub delete: Arc<DeleteClientUseCase>,
}

#[derive(Clone)]
pub struct InvoiceUseCases {
  pub create: Arc<CreateInvoiceUseCase>,
  pub list: Arc<ListInvoicesUseCase>,
  pub get: Arc<GetInvoiceDetailsUseCase>,
  pub update: Arc<UpdateInvoiceUseCase>,
  pub delete: Arc<DeleteInvoiceUseCase>,
  pub export_pdf: Arc<ExportInvoicesPdfUseCase>,
  pub export_csv: Arc<ExportInvoicesCsvUseCase>,
}

/// Everything the `/api` scope needs, built once in `main` and cloned per worker
#[derive(Clone)]
pub struct ApiRouteDependencies {
  pub auth: AuthUseCases,
  pub companies: CompanyUseCases,
  pub clients: ClientUseCases,
  pub invoices: InvoiceUseCases,
}

/// Malformed JSON bodies are reported as validation errors
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
    let message = match &err {
      error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
      other => other.to_string(),
    };
    ApiError::validation(message).into()
  })
}

/// A path id that is not a UUID cannot name an existing resource
pub fn path_config() -> web::PathConfig {
  web::PathConfig::default().error_handler(|_, req: &HttpRequest| {
    ApiError::NotFound(format!("No resource at {}", req.path())).into()
  })
}

pub fn query_config() -> web::QueryConfig {
  web::QueryConfig::default()
    .error_handler(|err, _req: &HttpRequest| ApiError::validation(err.to_string()).into())
}

/// Configure authentication routes
///
/// # Routes
///
/// - POST /register - Register a new user account (public)
/// - POST /login - Authenticate and receive a bearer token (public)
/// - POST /logout - Revoke the presented token
/// - GET /user - Current user
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, use_cases: AuthUseCases) {
  cfg
    .app_data(web::Data::new(use_cases.register))
    .app_data(web::Data::new(use_cases.login))
    .app_data(web::Data::new(use_cases.logout))
    .app_data(web::Data::new(use_cases.current_user.clone()))
    .route("/register", web::post().to(auth::register_handler))
    .route("/login", web::post().to(auth::login_handler))
    .service(
      web::resource("/logout")
        .wrap(AuthMiddleware::new(use_cases.current_user.clone()))
        .route(web::post().to(auth::logout_handler)),
    )
    .service(
      web::resource("/user")
        .wrap(AuthMiddleware::new(use_cases.current_user))
        .route(web::get().to(auth::get_current_user_handler)),
    );
}

/// Configure company routes
///
/// # Routes
///
/// - GET / - Paginated list, newest first
/// - POST / - Create a company
/// - GET|PUT|PATCH|DELETE /{id}
pub fn configure_company_routes(cfg: &mut web::ServiceConfig, use_cases: CompanyUseCases) {
  cfg
    .app_data(web::Data::new(use_cases.create))
    .app_data(web::Data::new(use_cases.list))
    .app_data(web::Data::new(use_cases.get))
    .app_data(web::Data::new(use_cases.update))
    .app_data(web::Data::new(use_cases.delete))
    .route("", web::get().to(companies::list_companies_handler))
    .route("", web::post().to(companies::create_company_handler))
    .route("/{id}", web::get().to(companies::get_company_handler))
    .route("/{id}", web::put().to(companies::update_company_handler))
    .route("/{id}", web::patch().to(companies::update_company_handler))
    .route("/{id}", web::delete().to(companies::delete_company_handler));
}

/// Configure client routes
///
/// # Routes
///
/// - GET / - Paginated list with each client's company
/// - POST / - Create a client
/// - GET|PUT|PATCH|DELETE /{id}
pub fn configure_client_routes(cfg: &mut web::ServiceConfig, use_cases: ClientUseCases) {
  cfg
    .app_data(web::Data::new(use_cases.create))
    .app_data(web::Data::new(use_cases.list))
    .app_data(web::Data::new(use_cases.get))
    .app_data(web::Data::new(use_cases.update))
    .app_data(web::Data::new(use_cases.delete))
    .route("", web::get().to(clients::list_clients_handler))
    .route("", web::post().to(clients::create_client_handler))
    .route("/{id}", web::get().to(clients::get_client_handler))
    .route("/{id}", web::put().to(clients::update_client_handler))
    .route("/{id}", web::patch().to(clients::update_client_handler))
    .route("/{id}", web::delete().to(clients::delete_client_handler));
}

/// Configure invoice routes
///
/// The export routes are registered before `/{id}` so `export` is never
/// taken for an invoice id.
///
/// # Routes
///
/// - GET /export/pdf?ids[]=... - PDF attachment, one page per invoice
/// - GET /export/csv?ids[]=... - CSV attachment
/// - GET / - Paginated list with company and client
/// - POST / - Create an invoice with its items
/// - GET|PUT|PATCH|DELETE /{id}
pub fn configure_invoice_routes(cfg: &mut web::ServiceConfig, use_cases: InvoiceUseCases) {
  cfg
    .app_data(web::Data::new(use_cases.create))
    .app_data(web::Data::new(use_cases.list))
    .app_data(web::Data::new(use_cases.get))
    .app_data(web::Data::new(use_cases.update))
    .app_data(web::Data::new(use_cases.delete))
    .app_data(web::Data::new(use_cases.export_pdf))
    .app_data(web::Data::new(use_cases.export_csv))
    .route("/export/pdf", web::get().to(invoices::export_pdf_handler))
    .route("/export/csv", web::get().to(invoices::export_csv_handler))
    .route("", web::get().to(invoices::list_invoices_handler))
    .route("", web::post().to(invoices::create_invoice_handler))
    .route("/{id}", web::get().to(invoices::get_invoice_handler))
    .route("/{id}", web::put().to(invoices::update_invoice_handler))
    .route("/{id}", web::patch().to(invoices::update_invoice_handler))
    .route("/{id}", web::delete().to(invoices::delete_invoice_handler));
}

/// Mounts the whole REST API; callers wrap it in `web::scope("/api")`
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, deps: ApiRouteDependencies) {
  let current_user = deps.auth.current_user.clone();

  cfg
    .app_data(json_config())
    .app_data(path_config())
    .app_data(query_config())
    .service(
      web::scope("/companies")
        .wrap(AuthMiddleware::new(current_user.clone()))
        .configure(|cfg| configure_company_routes(cfg, deps.companies)),
    )
    .service(
      web::scope("/clients")
        .wrap(AuthMiddleware::new(current_user.clone()))
        .configure(|cfg| configure_client_routes(cfg, deps.clients)),
    )
    .service(
      web::scope("/invoices")
        .wrap(AuthMiddleware::new(current_user))
        .configure(|cfg| configure_invoice_routes(cfg, deps.invoices)),
    )
    .configure(|cfg| configure_auth_routes(cfg, deps.auth));
}
