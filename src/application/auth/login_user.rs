use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::views::UserView;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub user: UserView,
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::InvalidCredentials` for an unknown email or a
  /// wrong password
  pub async fn execute(&self, command: LoginUserCommand) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::for_verification(command.password);

    let (user, session, token) = self.auth_service.login(email, password).await?;

    Ok(LoginUserResponse {
      user: UserView::from(&user),
      token: token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
