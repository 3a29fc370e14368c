use actix_web::{
  Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
  body::EitherBody,
  dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};
use uuid::Uuid;

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  application::auth::GetCurrentUserUseCase,
};

/// Authentication middleware that resolves the bearer token to a user
///
/// This middleware:
/// 1. Extracts the token from the `Authorization: Bearer <token>` header
/// 2. Resolves it through `GetCurrentUserUseCase`
/// 3. Stores an [`AuthenticatedUser`] in the request extensions
/// 4. Answers 401 with a JSON error body when the token is missing or invalid
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use facturo::application::auth::GetCurrentUserUseCase;
/// # use facturo::adapters::http::middleware::auth::AuthMiddleware;
///
/// # async fn example(get_user_use_case: Arc<GetCurrentUserUseCase>) {
/// let app = App::new().service(
///   web::scope("/api/companies")
///     .wrap(AuthMiddleware::new(get_user_use_case))
///     .route("", web::get().to(|| async { "Protected endpoint" })),
/// );
/// # }
/// ```
#[derive(Clone)]
pub struct AuthMiddleware {
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl AuthMiddleware {
  pub fn new(get_user_use_case: Arc<GetCurrentUserUseCase>) -> Self {
    Self { get_user_use_case }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      get_user_use_case: self.get_user_use_case.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let get_user_use_case = self.get_user_use_case.clone();

    Box::pin(async move {
      let token = match extract_bearer_token(&req) {
        Ok(token) => token,
        Err(e) => {
          tracing::warn!("Rejected request to {}: missing bearer token", req.path());
          return Ok(reject(req, e));
        }
      };

      let user = match get_user_use_case.execute(token.clone()).await {
        Ok(user) => user,
        Err(e) => {
          let api_error = ApiError::from(e);
          tracing::warn!("Rejected request to {}: {}", req.path(), api_error);
          return Ok(reject(req, api_error));
        }
      };

      req.extensions_mut().insert(AuthenticatedUser {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
      });

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn reject<B>(req: ServiceRequest, error: ApiError) -> ServiceResponse<EitherBody<B>> {
  let (request, _) = req.into_parts();
  let response = error.error_response().map_into_right_body();
  ServiceResponse::new(request, response)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// The user behind the bearer token of the current request
///
/// Usable as a handler argument on routes wrapped by [`AuthMiddleware`];
/// on any other route extraction fails with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  /// Raw token, needed to revoke the session on logout
  pub token: String,
}

impl FromRequest for AuthenticatedUser {
  type Error = ApiError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
    ready(
      req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(ApiError::Auth(AuthErrorKind::InvalidSession)),
    )
  }
}
