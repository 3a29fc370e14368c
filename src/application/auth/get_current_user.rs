use std::sync::Arc;

use crate::application::views::UserView;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Resolves a bearer token to the user it belongs to
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::InvalidSession` for unknown or expired tokens and
  /// `AuthError::Validation` for malformed ones
  pub async fn execute(&self, session_token: String) -> Result<UserView, AuthError> {
    let token = SessionToken::from_string(session_token)?;

    let user = self.auth_service.validate_session(token).await?;

    Ok(UserView::from(&user))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::{Email, Password, UserName};
  use crate::test_utils::{InMemorySessionRepository, InMemoryUserRepository, fast_password_hasher};

  fn service(ttl: chrono::Duration) -> Arc<AuthService> {
    Arc::new(AuthService::new(
      Arc::new(InMemoryUserRepository::default()),
      Arc::new(InMemorySessionRepository::default()),
      fast_password_hasher(),
      ttl,
    ))
  }

  async fn register(service: &AuthService) -> String {
    let (_, _, token) = service
      .register(
        UserName::new("Ana").unwrap(),
        Email::new("ana@example.com").unwrap(),
        Password::new("password123").unwrap(),
      )
      .await
      .unwrap();
    token.into_inner()
  }

  #[tokio::test]
  async fn test_valid_token_resolves_user() {
    let service = service(chrono::Duration::hours(1));
    let token = register(&service).await;

    let user = GetCurrentUserUseCase::new(service).execute(token).await.unwrap();

    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.name, "Ana");
  }

  #[tokio::test]
  async fn test_expired_token_is_rejected() {
    let service = service(chrono::Duration::seconds(-1));
    let token = register(&service).await;

    let result = GetCurrentUserUseCase::new(service).execute(token).await;

    assert!(matches!(result, Err(AuthError::InvalidSession)));
  }

  #[tokio::test]
  async fn test_malformed_token_is_rejected() {
    let result = GetCurrentUserUseCase::new(service(chrono::Duration::hours(1)))
      .execute("not-a-token".to_string())
      .await;

    assert!(matches!(result, Err(AuthError::Validation(_))));
  }
}
