use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreateCompanyRequest, DataResponse, PageQuery, UpdateCompanyRequest},
  errors::ApiError,
};
use crate::application::company::{
  CreateCompanyCommand, CreateCompanyUseCase, DeleteCompanyUseCase, GetCompanyUseCase,
  ListCompaniesUseCase, UpdateCompanyCommand, UpdateCompanyUseCase,
};

/// GET /api/companies?page=N
pub async fn list_companies_handler(
  query: web::Query<PageQuery>,
  use_case: web::Data<Arc<ListCompaniesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let companies = use_case.execute(query.page).await?;

  Ok(HttpResponse::Ok().json(companies))
}

/// POST /api/companies
pub async fn create_company_handler(
  request: web::Json<CreateCompanyRequest>,
  use_case: web::Data<Arc<CreateCompanyUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = CreateCompanyCommand {
    name: request.name,
    tax_id: request.tax_id,
    person_type: request.person_type,
    email: request.email,
    phone: request.phone,
    address: request.address,
  };

  let company = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(DataResponse::new(company)))
}

/// GET /api/companies/{id}
pub async fn get_company_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetCompanyUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let company = use_case.execute(path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(DataResponse::new(company)))
}

/// PUT|PATCH /api/companies/{id}
pub async fn update_company_handler(
  path: web::Path<Uuid>,
  request: web::Json<UpdateCompanyRequest>,
  use_case: web::Data<Arc<UpdateCompanyUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = UpdateCompanyCommand {
    company_id: path.into_inner(),
    name: request.name,
    tax_id: request.tax_id,
    person_type: request.person_type,
    email: request.email,
    phone: request.phone,
    address: request.address,
  };

  let company = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(DataResponse::new(company)))
}

/// DELETE /api/companies/{id}
pub async fn delete_company_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteCompanyUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let company_id = path.into_inner();
  use_case.execute(company_id).await?;

  Ok(HttpResponse::NoContent().finish())
}
