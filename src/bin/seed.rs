//! Loads the demo dataset: two companies, three clients and three invoices.
//!
//! Everything goes through the regular use cases, so the invoice totals come
//! from the calculator. Running it twice is a no-op.

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use facturo::{
  application::company::{CreateCompanyCommand, CreateCompanyUseCase},
  application::invoice::{
    CreateClientCommand, CreateClientUseCase, CreateInvoiceCommand, CreateInvoiceUseCase,
    InvoiceItemInput,
  },
  domain::company::{CompanyError, CompanyService},
  domain::invoice::{InvoiceService, InvoiceServiceDependencies},
  infrastructure::{
    config::Config,
    persistence::postgres::{
      PostgresClientRepository, PostgresCompanyRepository, PostgresInvoiceRepository,
    },
  },
};

struct Seeder {
  companies: CreateCompanyUseCase,
  clients: CreateClientUseCase,
  invoices: CreateInvoiceUseCase,
}

fn company(
  name: &str,
  tax_id: &str,
  person_type: &str,
  email: &str,
  phone: &str,
  address: &str,
) -> CreateCompanyCommand {
  CreateCompanyCommand {
    name: name.to_string(),
    tax_id: tax_id.to_string(),
    person_type: person_type.to_string(),
    email: Some(email.to_string()),
    phone: Some(phone.to_string()),
    address: Some(address.to_string()),
  }
}

fn client(
  company_id: Uuid,
  name: &str,
  tax_id: &str,
  person_type: &str,
  email: &str,
  phone: Option<&str>,
  address: &str,
) -> CreateClientCommand {
  CreateClientCommand {
    company_id: Some(company_id),
    name: name.to_string(),
    tax_id: Some(tax_id.to_string()),
    person_type: person_type.to_string(),
    email: Some(email.to_string()),
    phone: phone.map(str::to_string),
    address: Some(address.to_string()),
  }
}

fn item(description: &str, quantity: Decimal, unit_price: Decimal) -> InvoiceItemInput {
  InvoiceItemInput {
    description: description.to_string(),
    quantity,
    unit_price,
  }
}

fn days_ago(days: u64) -> anyhow::Result<NaiveDate> {
  Utc::now()
    .date_naive()
    .checked_sub_days(Days::new(days))
    .context("date out of range")
}

impl Seeder {
  async fn run(&self) -> anyhow::Result<()> {
    let tech = match self
      .companies
      .execute(company(
        "Servicios Tech SA de CV",
        "STE850101ABC",
        "MORAL",
        "contacto@serviciostech.mx",
        "5551234567",
        "Av. Reforma 123, CDMX",
      ))
      .await
    {
      Ok(company) => company,
      Err(CompanyError::TaxIdAlreadyExists(_)) => {
        tracing::info!("Demo data already present, nothing to do");
        return Ok(());
      }
      Err(e) => return Err(e).context("creating Servicios Tech"),
    };

    let juan = self
      .companies
      .execute(company(
        "Juan Pérez López",
        "PELJ800101ABC",
        "FISICA",
        "juan.perez@email.com",
        "5559876543",
        "Calle Juárez 45, Monterrey",
      ))
      .await
      .context("creating Juan Pérez López")?;

    let norte = self
      .clients
      .execute(client(
        tech.id,
        "Distribuidora Norte SA",
        "DNS900101XYZ",
        "MORAL",
        "compras@distribuidoranorte.mx",
        Some("8181112233"),
        "Blvd. Industrial 100, Monterrey",
      ))
      .await
      .context("creating Distribuidora Norte")?;

    let maria = self
      .clients
      .execute(client(
        tech.id,
        "María García Hernández",
        "GAHM850505DEF",
        "FISICA",
        "maria.garcia@email.com",
        Some("3334445566"),
        "Calle Hidalgo 78, Guadalajara",
      ))
      .await
      .context("creating María García Hernández")?;

    let consultores = self
      .clients
      .execute(client(
        juan.id,
        "Consultores Asociados SC",
        "CAS950101GHI",
        "MORAL",
        "info@consultores.mx",
        None,
        "Av. Insurgentes 200, CDMX",
      ))
      .await
      .context("creating Consultores Asociados")?;

    let invoices = [
      CreateInvoiceCommand {
        company_id: tech.id,
        client_id: norte.id,
        date: days_ago(10)?,
        status: Some("sent".to_string()),
        currency: Some("MXN".to_string()),
        items: vec![
          item("Desarrollo de sitio web corporativo", dec!(1), dec!(10000.00)),
          item("Mantenimiento mensual hosting", dec!(5), dec!(1000.00)),
        ],
      },
      CreateInvoiceCommand {
        company_id: tech.id,
        client_id: maria.id,
        date: days_ago(5)?,
        status: Some("draft".to_string()),
        currency: Some("MXN".to_string()),
        items: vec![item("Consultoría SEO", dec!(7), dec!(500.00))],
      },
      CreateInvoiceCommand {
        company_id: juan.id,
        client_id: consultores.id,
        date: days_ago(0)?,
        status: Some("paid".to_string()),
        currency: Some("MXN".to_string()),
        items: vec![
          item("Auditoría de sistemas", dec!(1), dec!(5000.00)),
          item("Capacitación en sitio", dec!(3), dec!(1000.00)),
        ],
      },
    ];

    for command in invoices {
      let invoice = self
        .invoices
        .execute(command)
        .await
        .context("creating demo invoice")?;
      tracing::info!(
        invoice_id = %invoice.id,
        subtotal = %invoice.subtotal,
        tax = %invoice.tax,
        total = %invoice.total,
        "Seeded invoice"
      );
    }

    Ok(())
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "facturo=debug,seed=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load().context("loading configuration")?;

  let pool = PgPoolOptions::new()
    .max_connections(2)
    .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
    .connect(&config.database.url)
    .await
    .context("connecting to the database")?;

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("running migrations")?;

  let company_repo = Arc::new(PostgresCompanyRepository::new(pool.clone()));
  let company_service = Arc::new(CompanyService::new(company_repo.clone()));
  let invoice_service = Arc::new(InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
    client_repo: Arc::new(PostgresClientRepository::new(pool.clone())),
    company_repo,
  }));

  let seeder = Seeder {
    companies: CreateCompanyUseCase::new(company_service),
    clients: CreateClientUseCase::new(invoice_service.clone()),
    invoices: CreateInvoiceUseCase::new(invoice_service),
  };

  seeder.run().await?;

  tracing::info!("Seeding finished");
  Ok(())
}
