use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::views::UserView;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password, UserName, ValueObjectError};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  pub name: String,
  pub email: String,
  /// Plain text, hashed by the service
  pub password: String,
  pub password_confirmation: String,
}

/// Registered user plus a bearer token for immediate use
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  pub user: UserView,
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::EmailAlreadyExists` for a taken email and
  /// `AuthError::Validation` for malformed input
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    if command.password != command.password_confirmation {
      return Err(ValueObjectError::PasswordConfirmationMismatch.into());
    }

    let name = UserName::new(command.name)?;
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let (user, session, token) = self.auth_service.register(name, email, password).await?;

    Ok(RegisterUserResponse {
      user: UserView::from(&user),
      token: token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
