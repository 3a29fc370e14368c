use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{AuthResponse, LoginRequest, RegisterRequest, SuccessResponse, UserResponse},
  errors::ApiError,
  middleware::AuthenticatedUser,
};
use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserCommand, LoginUserUseCase, LogoutUserUseCase,
  RegisterUserCommand, RegisterUserUseCase,
};

/// Handler for user registration
///
/// POST /api/register
/// Body: RegisterRequest (JSON)
/// Response: AuthResponse (JSON) with status 201
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = RegisterUserCommand {
    name: request.name,
    email: request.email,
    password: request.password,
    password_confirmation: request.password_confirmation,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(AuthResponse::bearer(
    "User registered successfully",
    response.token,
    response.user,
  )))
}

/// Handler for user login
///
/// POST /api/login
/// Body: LoginRequest (JSON)
/// Response: AuthResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = LoginUserCommand {
    email: request.email,
    password: request.password,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(AuthResponse::bearer(
    "Login successful",
    response.token,
    response.user,
  )))
}

/// Handler for logout; revokes the presented token
///
/// POST /api/logout
pub async fn logout_handler(
  user: AuthenticatedUser,
  use_case: web::Data<Arc<LogoutUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case.execute(user.token).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Logged out successfully".to_string(),
  }))
}

/// Handler for the current user
///
/// GET /api/user
pub async fn get_current_user_handler(
  user: AuthenticatedUser,
  use_case: web::Data<Arc<GetCurrentUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = use_case.execute(user.token).await?;

  Ok(HttpResponse::Ok().json(UserResponse { user }))
}
