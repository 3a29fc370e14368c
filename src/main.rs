use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use facturo::{
  adapters::http::{
    ApiRouteDependencies, AuthUseCases, ClientUseCases, CompanyUseCases, InvoiceUseCases,
    RequestIdMiddleware, configure_api_routes,
  },
  application::auth::{
    GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
  },
  application::company::{
    CreateCompanyUseCase, DeleteCompanyUseCase, GetCompanyUseCase, ListCompaniesUseCase,
    UpdateCompanyUseCase,
  },
  application::invoice::{
    CreateClientUseCase, CreateInvoiceUseCase, DeleteClientUseCase, DeleteInvoiceUseCase,
    ExportInvoicesCsvUseCase, ExportInvoicesPdfUseCase, GetClientUseCase,
    GetInvoiceDetailsUseCase, ListClientsUseCase, ListInvoicesUseCase, UpdateClientUseCase,
    UpdateInvoiceUseCase,
  },
  domain::auth::AuthService,
  domain::company::CompanyService,
  domain::invoice::{InvoiceService, InvoiceServiceDependencies},
  infrastructure::{
    config::Config,
    documents::{CsvInvoiceExporter, InvoiceHtmlRenderer, WkHtmlToPdfGenerator},
    persistence::postgres::{
      PostgresClientRepository, PostgresCompanyRepository, PostgresInvoiceRepository,
      PostgresSessionRepository, PostgresUserRepository,
    },
    security::Argon2PasswordHasher,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "facturo=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Facturo");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  // Repositories
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(db_pool.clone()));
  let company_repo = Arc::new(PostgresCompanyRepository::new(db_pool.clone()));
  let client_repo = Arc::new(PostgresClientRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));

  // Security
  let password_hasher = Arc::new(
    Argon2PasswordHasher::new().map_err(|e| std::io::Error::other(e.to_string()))?,
  );

  // Domain services
  let auth_service = Arc::new(AuthService::new(
    user_repo,
    session_repo,
    password_hasher,
    chrono::Duration::seconds(config.security.session_ttl_seconds as i64),
  ));
  let company_service = Arc::new(CompanyService::new(company_repo.clone()));
  let invoice_service = Arc::new(InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo,
    client_repo,
    company_repo,
  }));

  // Document generation
  let renderer = InvoiceHtmlRenderer::new().map_err(|e| {
    tracing::error!("Failed to load invoice template: {}", e);
    std::io::Error::other(e.to_string())
  })?;
  let pdf_generator = Arc::new(WkHtmlToPdfGenerator::new(
    renderer,
    config.pdf.wkhtmltopdf_path.clone(),
    config.pdf.page_size.clone(),
  ));
  let csv_exporter = Arc::new(CsvInvoiceExporter::new());

  let per_page = config.pagination.per_page;

  let dependencies = ApiRouteDependencies {
    auth: AuthUseCases {
      register: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
      login: Arc::new(LoginUserUseCase::new(auth_service.clone())),
      logout: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
      current_user: Arc::new(GetCurrentUserUseCase::new(auth_service)),
    },
    companies: CompanyUseCases {
      create: Arc::new(CreateCompanyUseCase::new(company_service.clone())),
      list: Arc::new(ListCompaniesUseCase::new(company_service.clone(), per_page)),
      get: Arc::new(GetCompanyUseCase::new(company_service.clone())),
      update: Arc::new(UpdateCompanyUseCase::new(company_service.clone())),
      delete: Arc::new(DeleteCompanyUseCase::new(company_service)),
    },
    clients: ClientUseCases {
      create: Arc::new(CreateClientUseCase::new(invoice_service.clone())),
      list: Arc::new(ListClientsUseCase::new(invoice_service.clone(), per_page)),
      get: Arc::new(GetClientUseCase::new(invoice_service.clone())),
      update: Arc::new(UpdateClientUseCase::new(invoice_service.clone())),
      delete: Arc::new(DeleteClientUseCase::new(invoice_service.clone())),
    },
    invoices: InvoiceUseCases {
      create: Arc::new(CreateInvoiceUseCase::new(invoice_service.clone())),
      list: Arc::new(ListInvoicesUseCase::new(invoice_service.clone(), per_page)),
      get: Arc::new(GetInvoiceDetailsUseCase::new(invoice_service.clone())),
      update: Arc::new(UpdateInvoiceUseCase::new(invoice_service.clone())),
      delete: Arc::new(DeleteInvoiceUseCase::new(invoice_service.clone())),
      export_pdf: Arc::new(ExportInvoicesPdfUseCase::new(
        invoice_service.clone(),
        pdf_generator,
      )),
      export_csv: Arc::new(ExportInvoicesCsvUseCase::new(invoice_service, csv_exporter)),
    },
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let dependencies = dependencies.clone();

    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::new(r#"%a "%r" %s %b %Dms req=%{x-request-id}o"#))
      .service(web::scope("/api").configure(|cfg| configure_api_routes(cfg, dependencies)))
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
