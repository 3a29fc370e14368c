//! In-memory repository fakes shared by service, use-case and HTTP tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{PasswordHasher, SessionRepository, UserRepository};
use crate::domain::auth::value_objects::{Email, TokenHash};
use crate::domain::auth::{AuthService, Session, User};
use crate::domain::company::{
  Company, CompanyError, CompanyRepository, NewCompany, PartyName, PersonType, PostalAddress,
  TaxId,
};
use crate::domain::invoice::calculator::{LineItem, calculate_totals};
use crate::domain::invoice::entities::{Client, Invoice, InvoiceDetails, InvoiceItem, NewClient};
use crate::domain::invoice::value_objects::{Currency, InvoiceStatus};
use crate::domain::invoice::errors::InvoiceError;
use crate::domain::invoice::ports::{ClientRepository, InvoiceRepository};
use crate::domain::invoice::services::{InvoiceService, InvoiceServiceDependencies};
use crate::domain::pagination::{Page, PageRequest};
use crate::infrastructure::security::Argon2PasswordHasher;

// ============================================================================
// Builders
// ============================================================================

pub fn organization(name: &str, tax_id: &str) -> NewCompany {
  NewCompany {
    name: PartyName::new(name).unwrap(),
    tax_id: TaxId::new(tax_id).unwrap(),
    person_type: PersonType::Organization,
    email: None,
    phone: None,
    address: None,
  }
}

pub fn line(description: &str, quantity: Decimal, unit_price: Decimal) -> LineItem {
  LineItem::new(description, quantity, unit_price).unwrap()
}

/// A fully loaded invoice for document rendering, dated 2024-01-15
pub fn invoice_details(lines: Vec<LineItem>) -> InvoiceDetails {
  let mut company_data = organization("Servicios Tech SA de CV", "STE850101ABC");
  company_data.address = Some(PostalAddress::new("Av. Reforma 100, CDMX").unwrap());
  let company = Company::new(company_data).unwrap();

  let client = Client::new(NewClient {
    company_id: Some(company.id),
    name: PartyName::new("Distribuidora Norte SA").unwrap(),
    tax_id: Some(TaxId::new("DNS900101XYZ").unwrap()),
    person_type: PersonType::Organization,
    email: None,
    phone: None,
    address: None,
  })
  .unwrap();

  let invoice = Invoice::new(
    company.id,
    client.id,
    chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    InvoiceStatus::new("sent").unwrap(),
    Currency::default(),
    calculate_totals(&lines).unwrap(),
  );
  let items = InvoiceItem::from_lines(invoice.id, lines);

  InvoiceDetails {
    invoice,
    company: Some(company),
    client: Some(client),
    items,
  }
}

/// Argon2id with minimal cost so tests stay fast
pub fn fast_password_hasher() -> Arc<dyn PasswordHasher> {
  Arc::new(Argon2PasswordHasher::with_params(64, 1, 1).unwrap())
}

/// Auth service over fresh in-memory user and session stores
pub fn auth_service() -> Arc<AuthService> {
  Arc::new(AuthService::new(
    Arc::new(InMemoryUserRepository::default()),
    Arc::new(InMemorySessionRepository::default()),
    fast_password_hasher(),
    chrono::Duration::hours(1),
  ))
}

fn paginate<T: Clone>(rows: &[T], page: PageRequest) -> Page<T> {
  // Rows are kept in insertion order; lists are newest first
  let items = rows
    .iter()
    .rev()
    .skip(page.offset() as usize)
    .take(page.limit() as usize)
    .cloned()
    .collect();
  Page::new(items, page, rows.len() as i64)
}

// ============================================================================
// Shared entity store
// ============================================================================

#[derive(Default)]
struct StoreState {
  companies: Vec<Company>,
  clients: Vec<Client>,
  invoices: Vec<Invoice>,
  items: Vec<InvoiceItem>,
}

/// One in-memory "database" behind the company, client and invoice fakes,
/// so cross-table checks (dependents, cascades) behave like Postgres.
#[derive(Default, Clone)]
pub struct InMemoryStore {
  state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
  fn lock(&self) -> MutexGuard<'_, StoreState> {
    self.state.lock().unwrap()
  }

  pub fn companies(&self) -> Arc<InMemoryCompanyRepository> {
    Arc::new(InMemoryCompanyRepository {
      store: self.clone(),
    })
  }

  pub fn clients(&self) -> Arc<InMemoryClientRepository> {
    Arc::new(InMemoryClientRepository {
      store: self.clone(),
    })
  }

  pub fn invoices(&self) -> Arc<InMemoryInvoiceRepository> {
    Arc::new(InMemoryInvoiceRepository {
      store: self.clone(),
    })
  }

  pub fn invoice_count(&self) -> usize {
    self.lock().invoices.len()
  }

  pub fn items_of(&self, invoice_id: Uuid) -> Vec<InvoiceItem> {
    self
      .lock()
      .items
      .iter()
      .filter(|i| i.invoice_id == invoice_id)
      .cloned()
      .collect()
  }

  pub fn item_ids(&self) -> Vec<Uuid> {
    self.lock().items.iter().map(|i| i.id).collect()
  }

  /// Invoice service wired to this store
  pub fn invoice_service(&self) -> Arc<InvoiceService> {
    Arc::new(InvoiceService::new(InvoiceServiceDependencies {
      invoice_repo: self.invoices(),
      client_repo: self.clients(),
      company_repo: self.companies(),
    }))
  }

  /// Inserts an organization directly into the store
  pub fn seed_company(&self, name: &str, tax_id: &str) -> Company {
    let company = Company::new(organization(name, tax_id)).unwrap();
    self.lock().companies.push(company.clone());
    company
  }

  /// Inserts a client attached to `company_id` directly into the store
  pub fn seed_client_for(&self, company_id: Uuid) -> Client {
    let client = Client::new(NewClient {
      company_id: Some(company_id),
      name: PartyName::new("Distribuidora Norte SA").unwrap(),
      tax_id: Some(TaxId::new("DNS900101XYZ").unwrap()),
      person_type: PersonType::Organization,
      email: None,
      phone: None,
      address: None,
    })
    .unwrap();
    self.lock().clients.push(client.clone());
    client
  }
}

// ============================================================================
// Company fake
// ============================================================================

pub struct InMemoryCompanyRepository {
  store: InMemoryStore,
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
  async fn create(&self, company: Company) -> Result<Company, CompanyError> {
    let mut state = self.store.lock();
    if state.companies.iter().any(|c| c.tax_id == company.tax_id) {
      return Err(CompanyError::TaxIdAlreadyExists(
        company.tax_id.into_inner(),
      ));
    }
    state.companies.push(company.clone());
    Ok(company)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError> {
    Ok(self.store.lock().companies.iter().find(|c| c.id == id).cloned())
  }

  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, CompanyError> {
    Ok(
      self
        .store
        .lock()
        .companies
        .iter()
        .filter(|c| ids.contains(&c.id))
        .cloned()
        .collect(),
    )
  }

  async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Company>, CompanyError> {
    Ok(
      self
        .store
        .lock()
        .companies
        .iter()
        .find(|c| &c.tax_id == tax_id)
        .cloned(),
    )
  }

  async fn list(&self, page: PageRequest) -> Result<Page<Company>, CompanyError> {
    Ok(paginate(&self.store.lock().companies, page))
  }

  async fn update(&self, company: Company) -> Result<Company, CompanyError> {
    let mut state = self.store.lock();
    let slot = state
      .companies
      .iter_mut()
      .find(|c| c.id == company.id)
      .ok_or(CompanyError::NotFound(company.id))?;
    *slot = company.clone();
    Ok(company)
  }

  async fn has_dependents(&self, id: Uuid) -> Result<bool, CompanyError> {
    let state = self.store.lock();
    Ok(
      state.clients.iter().any(|c| c.company_id == Some(id))
        || state.invoices.iter().any(|i| i.company_id == id),
    )
  }

  async fn delete(&self, id: Uuid) -> Result<bool, CompanyError> {
    let mut state = self.store.lock();
    let before = state.companies.len();
    state.companies.retain(|c| c.id != id);
    Ok(state.companies.len() < before)
  }
}

// ============================================================================
// Client fake
// ============================================================================

pub struct InMemoryClientRepository {
  store: InMemoryStore,
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
  async fn create(&self, client: Client) -> Result<Client, InvoiceError> {
    self.store.lock().clients.push(client.clone());
    Ok(client)
  }

  async fn update(&self, client: Client) -> Result<Client, InvoiceError> {
    let mut state = self.store.lock();
    let slot = state
      .clients
      .iter_mut()
      .find(|c| c.id == client.id)
      .ok_or(InvoiceError::ClientNotFound(client.id))?;
    *slot = client.clone();
    Ok(client)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, InvoiceError> {
    Ok(self.store.lock().clients.iter().find(|c| c.id == id).cloned())
  }

  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Client>, InvoiceError> {
    Ok(
      self
        .store
        .lock()
        .clients
        .iter()
        .filter(|c| ids.contains(&c.id))
        .cloned()
        .collect(),
    )
  }

  async fn list(&self, page: PageRequest) -> Result<Page<Client>, InvoiceError> {
    Ok(paginate(&self.store.lock().clients, page))
  }

  async fn has_invoices(&self, id: Uuid) -> Result<bool, InvoiceError> {
    Ok(self.store.lock().invoices.iter().any(|i| i.client_id == id))
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let mut state = self.store.lock();
    let before = state.clients.len();
    state.clients.retain(|c| c.id != id);
    Ok(state.clients.len() < before)
  }
}

// ============================================================================
// Invoice fake
// ============================================================================

pub struct InMemoryInvoiceRepository {
  store: InMemoryStore,
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
  async fn create(
    &self,
    invoice: Invoice,
    items: Vec<InvoiceItem>,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError> {
    let mut state = self.store.lock();
    state.invoices.push(invoice.clone());
    state.items.extend(items.iter().cloned());
    Ok((invoice, items))
  }

  async fn update(
    &self,
    invoice: Invoice,
    items: Option<Vec<InvoiceItem>>,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError> {
    let mut state = self.store.lock();
    let slot = state
      .invoices
      .iter_mut()
      .find(|i| i.id == invoice.id)
      .ok_or(InvoiceError::InvoiceNotFound(invoice.id))?;
    let (subtotal, tax, total) = (slot.subtotal, slot.tax, slot.total);
    *slot = invoice;
    if items.is_none() {
      slot.subtotal = subtotal;
      slot.tax = tax;
      slot.total = total;
    }
    let invoice = slot.clone();

    if let Some(items) = items {
      state.items.retain(|i| i.invoice_id != invoice.id);
      state.items.extend(items);
    }

    let items = state
      .items
      .iter()
      .filter(|i| i.invoice_id == invoice.id)
      .cloned()
      .collect();
    Ok((invoice, items))
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    Ok(self.store.lock().invoices.iter().find(|i| i.id == id).cloned())
  }

  async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Invoice>, InvoiceError> {
    Ok(
      self
        .store
        .lock()
        .invoices
        .iter()
        .filter(|i| ids.contains(&i.id))
        .cloned()
        .collect(),
    )
  }

  async fn list(&self, page: PageRequest) -> Result<Page<Invoice>, InvoiceError> {
    Ok(paginate(&self.store.lock().invoices, page))
  }

  async fn find_items(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, InvoiceError> {
    let mut items = self.store.items_of(invoice_id);
    items.sort_by_key(|i| i.position);
    Ok(items)
  }

  async fn find_items_for(&self, invoice_ids: &[Uuid]) -> Result<Vec<InvoiceItem>, InvoiceError> {
    let mut items: Vec<InvoiceItem> = self
      .store
      .lock()
      .items
      .iter()
      .filter(|i| invoice_ids.contains(&i.invoice_id))
      .cloned()
      .collect();
    items.sort_by_key(|i| i.position);
    Ok(items)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let mut state = self.store.lock();
    let before = state.invoices.len();
    state.invoices.retain(|i| i.id != id);
    if state.invoices.len() == before {
      return Ok(false);
    }
    state.items.retain(|i| i.invoice_id != id);
    Ok(true)
  }
}

// ============================================================================
// Auth fakes
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
  users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();
    if users.iter().any(|u| u.email == user.email) {
      return Err(AuthError::EmailAlreadyExists);
    }
    users.push(user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    Ok(
      self
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.email == email.as_str())
        .cloned(),
    )
  }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
  sessions: Mutex<Vec<Session>>,
}

impl InMemorySessionRepository {
  pub fn len(&self) -> usize {
    self.sessions.lock().unwrap().len()
  }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    self.sessions.lock().unwrap().push(session.clone());
    Ok(session)
  }

  async fn find_by_token_hash(&self, token_hash: &TokenHash) -> Result<Option<Session>, AuthError> {
    Ok(
      self
        .sessions
        .lock()
        .unwrap()
        .iter()
        .find(|s| s.token_hash == token_hash.as_str())
        .cloned(),
    )
  }

  async fn touch(&self, session_id: Uuid) -> Result<(), AuthError> {
    if let Some(session) = self
      .sessions
      .lock()
      .unwrap()
      .iter_mut()
      .find(|s| s.id == session_id)
    {
      session.last_used_at = Some(chrono::Utc::now());
    }
    Ok(())
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    self.sessions.lock().unwrap().retain(|s| s.id != session_id);
    Ok(())
  }
}
