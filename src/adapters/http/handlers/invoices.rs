use actix_web::{
  HttpRequest, HttpResponse,
  http::header::{ContentDisposition, DispositionParam, DispositionType},
  web,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreateInvoiceRequest, DataResponse, InvoiceItemRequest, PageQuery, UpdateInvoiceRequest},
  errors::ApiError,
};
use crate::application::invoice::{
  CreateInvoiceCommand, CreateInvoiceUseCase, DeleteInvoiceUseCase, ExportInvoicesCsvUseCase,
  ExportInvoicesPdfUseCase, ExportedDocument, GetInvoiceDetailsUseCase, InvoiceItemInput,
  ListInvoicesUseCase, UpdateInvoiceCommand, UpdateInvoiceUseCase,
};

fn item_inputs(items: Vec<InvoiceItemRequest>) -> Vec<InvoiceItemInput> {
  items
    .into_iter()
    .map(|item| InvoiceItemInput {
      description: item.description,
      quantity: item.quantity,
      unit_price: item.unit_price,
    })
    .collect()
}

/// Collects export ids from the raw query string.
///
/// Accepts `ids[]=a&ids[]=b`, `ids=a&ids=b`, indexed `ids[0]=a` and a single
/// comma-joined `ids=a,b`.
fn export_ids(req: &HttpRequest) -> Result<Vec<String>, ApiError> {
  let pairs: Vec<(String, String)> = serde_urlencoded::from_str(req.query_string())
    .map_err(|e| ApiError::validation(format!("Invalid query string: {}", e)))?;

  Ok(
    pairs
      .into_iter()
      .filter(|(key, _)| key == "ids" || (key.starts_with("ids[") && key.ends_with(']')))
      .flat_map(|(_, value)| {
        value
          .split(',')
          .map(str::to_string)
          .collect::<Vec<_>>()
      })
      .collect(),
  )
}

fn attachment(document: ExportedDocument) -> HttpResponse {
  HttpResponse::Ok()
    .content_type(document.content_type)
    .insert_header(ContentDisposition {
      disposition: DispositionType::Attachment,
      parameters: vec![DispositionParam::Filename(document.filename)],
    })
    .body(document.body)
}

/// GET /api/invoices?page=N
pub async fn list_invoices_handler(
  query: web::Query<PageQuery>,
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoices = use_case.execute(query.page).await?;

  Ok(HttpResponse::Ok().json(invoices))
}

/// POST /api/invoices
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = CreateInvoiceCommand {
    company_id: request.company_id,
    client_id: request.client_id,
    date: request.date,
    status: request.status,
    currency: request.currency,
    items: item_inputs(request.items),
  };

  let invoice = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(DataResponse::new(invoice)))
}

/// GET /api/invoices/{id}
pub async fn get_invoice_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice = use_case.execute(path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(DataResponse::new(invoice)))
}

/// PUT|PATCH /api/invoices/{id}
///
/// When `items` is present the existing items are replaced and the totals
/// recomputed; otherwise the totals are left untouched.
pub async fn update_invoice_handler(
  path: web::Path<Uuid>,
  request: web::Json<UpdateInvoiceRequest>,
  use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = UpdateInvoiceCommand {
    invoice_id: path.into_inner(),
    company_id: request.company_id,
    client_id: request.client_id,
    date: request.date,
    status: request.status,
    currency: request.currency,
    items: request.items.map(item_inputs),
  };

  let invoice = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(DataResponse::new(invoice)))
}

/// DELETE /api/invoices/{id}
pub async fn delete_invoice_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case.execute(path.into_inner()).await?;

  Ok(HttpResponse::NoContent().finish())
}

/// GET /api/invoices/export/pdf?ids[]=...
pub async fn export_pdf_handler(
  req: HttpRequest,
  use_case: web::Data<Arc<ExportInvoicesPdfUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let ids = export_ids(&req)?;
  let document = use_case.execute(ids).await?;

  Ok(attachment(document))
}

/// GET /api/invoices/export/csv?ids[]=...
pub async fn export_csv_handler(
  req: HttpRequest,
  use_case: web::Data<Arc<ExportInvoicesCsvUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let ids = export_ids(&req)?;
  let document = use_case.execute(ids).await?;

  Ok(attachment(document))
}
