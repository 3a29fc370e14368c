use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::company::{Company, CompanyRepository};
use crate::domain::pagination::{Page, PageRequest};

use super::calculator::calculate_totals;
use super::entities::{
  Client, ClientUpdate, Invoice, InvoiceDetails, InvoiceItem, InvoiceUpdate, NewClient, NewInvoice,
};
use super::errors::InvoiceError;
use super::ports::{ClientRepository, InvoiceRepository};

pub struct InvoiceServiceDependencies {
  pub invoice_repo: Arc<dyn InvoiceRepository>,
  pub client_repo: Arc<dyn ClientRepository>,
  pub company_repo: Arc<dyn CompanyRepository>,
}

/// Clients, invoices and the loading of invoices for export
pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  client_repo: Arc<dyn ClientRepository>,
  company_repo: Arc<dyn CompanyRepository>,
}

impl InvoiceService {
  pub fn new(deps: InvoiceServiceDependencies) -> Self {
    Self {
      invoice_repo: deps.invoice_repo,
      client_repo: deps.client_repo,
      company_repo: deps.company_repo,
    }
  }

  // Client operations

  pub async fn create_client(&self, data: NewClient) -> Result<Client, InvoiceError> {
    if let Some(company_id) = data.company_id {
      self.ensure_company_exists(company_id).await?;
    }

    let client = Client::new(data)?;
    let created = self.client_repo.create(client).await?;

    tracing::info!(client_id = %created.id, "Client created");

    Ok(created)
  }

  pub async fn get_client(&self, id: Uuid) -> Result<(Client, Option<Company>), InvoiceError> {
    let client = self.find_client(id).await?;
    let company = match client.company_id {
      Some(company_id) => self.company_repo.find_by_id(company_id).await?,
      None => None,
    };

    Ok((client, company))
  }

  pub async fn list_clients(
    &self,
    page: PageRequest,
  ) -> Result<Page<(Client, Option<Company>)>, InvoiceError> {
    let clients = self.client_repo.list(page).await?;
    let company_ids: Vec<Uuid> = clients.items.iter().filter_map(|c| c.company_id).collect();
    let companies = self.companies_by_id(&company_ids).await?;

    Ok(clients.map(|client| {
      let company = client
        .company_id
        .and_then(|id| companies.get(&id).cloned());
      (client, company)
    }))
  }

  pub async fn update_client(&self, id: Uuid, update: ClientUpdate) -> Result<Client, InvoiceError> {
    let mut client = self.find_client(id).await?;

    if let Some(Some(company_id)) = update.company_id {
      self.ensure_company_exists(company_id).await?;
    }

    client.apply(update)?;

    self.client_repo.update(client).await
  }

  /// Deletes a client that has no invoices
  pub async fn delete_client(&self, id: Uuid) -> Result<(), InvoiceError> {
    if self.client_repo.has_invoices(id).await? {
      return Err(InvoiceError::ClientHasInvoices(id));
    }

    if !self.client_repo.delete(id).await? {
      return Err(InvoiceError::ClientNotFound(id));
    }

    tracing::info!(client_id = %id, "Client deleted");

    Ok(())
  }

  // Invoice operations

  /// Creates an invoice with its items; totals come from the calculator
  pub async fn create_invoice(
    &self,
    data: NewInvoice,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError> {
    let totals = calculate_totals(&data.items)?;

    self.ensure_company_exists(data.company_id).await?;
    self.ensure_client_exists(data.client_id).await?;

    let invoice = Invoice::new(
      data.company_id,
      data.client_id,
      data.date,
      data.status,
      data.currency,
      totals,
    );
    let items = InvoiceItem::from_lines(invoice.id, data.items);

    let (invoice, items) = self.invoice_repo.create(invoice, items).await?;

    tracing::info!(
      invoice_id = %invoice.id,
      items = items.len(),
      total = %invoice.total,
      "Invoice created"
    );

    Ok((invoice, items))
  }

  /// Updates header fields and, when given, replaces the whole item list
  pub async fn update_invoice(
    &self,
    id: Uuid,
    update: InvoiceUpdate,
  ) -> Result<(Invoice, Vec<InvoiceItem>), InvoiceError> {
    let mut invoice = self.find_invoice(id).await?;

    let new_items = match update.items {
      Some(lines) => {
        invoice.set_totals(calculate_totals(&lines)?);
        Some(InvoiceItem::from_lines(invoice.id, lines))
      }
      None => None,
    };

    if let Some(company_id) = update.company_id {
      self.ensure_company_exists(company_id).await?;
      invoice.company_id = company_id;
    }
    if let Some(client_id) = update.client_id {
      self.ensure_client_exists(client_id).await?;
      invoice.client_id = client_id;
    }
    if let Some(date) = update.date {
      invoice.date = date;
    }
    if let Some(status) = update.status {
      invoice.status = status;
    }
    if let Some(currency) = update.currency {
      invoice.currency = currency;
    }
    invoice.updated_at = chrono::Utc::now();

    let replaced = new_items.is_some();
    let (invoice, items) = self.invoice_repo.update(invoice, new_items).await?;

    tracing::info!(invoice_id = %invoice.id, items_replaced = replaced, "Invoice updated");

    Ok((invoice, items))
  }

  /// Invoice with company, client and items
  pub async fn get_invoice_details(&self, id: Uuid) -> Result<InvoiceDetails, InvoiceError> {
    let invoice = self.find_invoice(id).await?;
    let company = self.company_repo.find_by_id(invoice.company_id).await?;
    let client = self.client_repo.find_by_id(invoice.client_id).await?;
    let items = self.invoice_repo.find_items(invoice.id).await?;

    Ok(InvoiceDetails {
      invoice,
      company,
      client,
      items,
    })
  }

  /// Newest first, with company and client resolved; items are not loaded
  pub async fn list_invoices(
    &self,
    page: PageRequest,
  ) -> Result<Page<InvoiceDetails>, InvoiceError> {
    let invoices = self.invoice_repo.list(page).await?;
    let (companies, clients) = self.parties_for(&invoices.items).await?;

    Ok(invoices.map(|invoice| InvoiceDetails {
      company: companies.get(&invoice.company_id).cloned(),
      client: clients.get(&invoice.client_id).cloned(),
      items: Vec::new(),
      invoice,
    }))
  }

  pub async fn delete_invoice(&self, id: Uuid) -> Result<(), InvoiceError> {
    if !self.invoice_repo.delete(id).await? {
      return Err(InvoiceError::InvoiceNotFound(id));
    }

    tracing::info!(invoice_id = %id, "Invoice deleted");

    Ok(())
  }

  /// Loads the requested invoices with every relation, in creation order.
  /// Unknown ids are skipped, so the result may be empty.
  pub async fn load_for_export(&self, ids: &[Uuid]) -> Result<Vec<InvoiceDetails>, InvoiceError> {
    if ids.is_empty() {
      return Err(InvoiceError::MissingInvoiceIds);
    }

    let mut unique_ids = ids.to_vec();
    unique_ids.sort_unstable();
    unique_ids.dedup();

    let invoices = self.invoice_repo.find_by_ids(&unique_ids).await?;
    if invoices.is_empty() {
      return Ok(Vec::new());
    }

    let (companies, clients) = self.parties_for(&invoices).await?;
    let invoice_ids: Vec<Uuid> = invoices.iter().map(|i| i.id).collect();
    let mut items_by_invoice: HashMap<Uuid, Vec<InvoiceItem>> = HashMap::new();
    for item in self.invoice_repo.find_items_for(&invoice_ids).await? {
      items_by_invoice.entry(item.invoice_id).or_default().push(item);
    }

    Ok(
      invoices
        .into_iter()
        .map(|invoice| InvoiceDetails {
          company: companies.get(&invoice.company_id).cloned(),
          client: clients.get(&invoice.client_id).cloned(),
          items: items_by_invoice.remove(&invoice.id).unwrap_or_default(),
          invoice,
        })
        .collect(),
    )
  }

  // Helper methods

  async fn find_client(&self, id: Uuid) -> Result<Client, InvoiceError> {
    self
      .client_repo
      .find_by_id(id)
      .await?
      .ok_or(InvoiceError::ClientNotFound(id))
  }

  async fn find_invoice(&self, id: Uuid) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(id))
  }

  async fn ensure_company_exists(&self, id: Uuid) -> Result<(), InvoiceError> {
    match self.company_repo.find_by_id(id).await? {
      Some(_) => Ok(()),
      None => Err(InvoiceError::CompanyNotFound(id)),
    }
  }

  async fn ensure_client_exists(&self, id: Uuid) -> Result<(), InvoiceError> {
    self.find_client(id).await.map(|_| ())
  }

  async fn companies_by_id(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Company>, InvoiceError> {
    if ids.is_empty() {
      return Ok(HashMap::new());
    }
    let companies = self.company_repo.find_by_ids(ids).await?;
    Ok(companies.into_iter().map(|c| (c.id, c)).collect())
  }

  async fn parties_for(
    &self,
    invoices: &[Invoice],
  ) -> Result<(HashMap<Uuid, Company>, HashMap<Uuid, Client>), InvoiceError> {
    let company_ids: Vec<Uuid> = invoices.iter().map(|i| i.company_id).collect();
    let client_ids: Vec<Uuid> = invoices.iter().map(|i| i.client_id).collect();

    let companies = self.companies_by_id(&company_ids).await?;
    let clients = if client_ids.is_empty() {
      HashMap::new()
    } else {
      self
        .client_repo
        .find_by_ids(&client_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect()
    };

    Ok((companies, clients))
  }
}
