use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreateClientRequest, DataResponse, PageQuery, UpdateClientRequest},
  errors::ApiError,
};
use crate::application::invoice::{
  CreateClientCommand, CreateClientUseCase, DeleteClientUseCase, GetClientUseCase,
  ListClientsUseCase, UpdateClientCommand, UpdateClientUseCase,
};

/// GET /api/clients?page=N
pub async fn list_clients_handler(
  query: web::Query<PageQuery>,
  use_case: web::Data<Arc<ListClientsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let clients = use_case.execute(query.page).await?;

  Ok(HttpResponse::Ok().json(clients))
}

/// POST /api/clients
pub async fn create_client_handler(
  request: web::Json<CreateClientRequest>,
  use_case: web::Data<Arc<CreateClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = CreateClientCommand {
    company_id: request.company_id,
    name: request.name,
    tax_id: request.tax_id,
    person_type: request.person_type,
    email: request.email,
    phone: request.phone,
    address: request.address,
  };

  let client = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(DataResponse::new(client)))
}

/// GET /api/clients/{id}
pub async fn get_client_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let client = use_case.execute(path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(DataResponse::new(client)))
}

/// PUT|PATCH /api/clients/{id}
pub async fn update_client_handler(
  path: web::Path<Uuid>,
  request: web::Json<UpdateClientRequest>,
  use_case: web::Data<Arc<UpdateClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = UpdateClientCommand {
    client_id: path.into_inner(),
    company_id: request.company_id,
    name: request.name,
    tax_id: request.tax_id,
    person_type: request.person_type,
    email: request.email,
    phone: request.phone,
    address: request.address,
  };

  let client = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(DataResponse::new(client)))
}

/// DELETE /api/clients/{id}
pub async fn delete_client_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let client_id = path.into_inner();
  use_case.execute(client_id).await?;

  Ok(HttpResponse::NoContent().finish())
}
