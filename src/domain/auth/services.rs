use chrono::Duration;
use std::sync::Arc;

use super::entities::{Session, User};
use super::errors::AuthError;
use super::ports::{PasswordHasher, SessionRepository, UserRepository};
use super::value_objects::{Email, Password, PasswordHash, SessionToken, UserName};

/// Default lifetime of a bearer token
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 60 * 60 * 24;

/// Authentication service: registration, login and bearer-token sessions
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  session_ttl: Duration,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    session_ttl: Duration,
  ) -> Self {
    Self {
      user_repo,
      session_repo,
      password_hasher,
      session_ttl,
    }
  }

  /// Registers a new user and opens a session for it
  ///
  /// # Errors
  /// Returns `AuthError::EmailAlreadyExists` if email is already registered
  pub async fn register(
    &self,
    name: UserName,
    email: Email,
    password: Password,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let user = User::new(
      name.into_inner(),
      email.into_inner(),
      password_hash.into_inner(),
    );

    // The repository reports a lost race on the unique email as EmailAlreadyExists
    let created_user = self.user_repo.create(user).await?;

    let (session, token) = self.open_session(&created_user).await?;

    tracing::info!(user_id = %created_user.id, "User registered");

    Ok((created_user, session, token))
  }

  /// Verifies credentials and opens a new session
  ///
  /// Unknown email and wrong password are indistinguishable to the caller.
  pub async fn login(
    &self,
    email: Email,
    password: Password,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let password_hash = PasswordHash::from_hash(&user.password_hash)?;

    if !self.password_hasher.verify(&password, &password_hash).await? {
      tracing::warn!(user_id = %user.id, "Rejected login with wrong password");
      return Err(AuthError::InvalidCredentials);
    }

    let (session, token) = self.open_session(&user).await?;

    Ok((user, session, token))
  }

  /// Revokes the session behind `token`
  pub async fn logout(&self, token: SessionToken) -> Result<(), AuthError> {
    let session = self
      .session_repo
      .find_by_token_hash(&token.hash())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    self.session_repo.delete(session.id).await?;

    tracing::info!(user_id = %session.user_id, "Session revoked");

    Ok(())
  }

  /// Resolves a bearer token to its user
  ///
  /// Expired sessions are deleted on sight.
  pub async fn validate_session(&self, token: SessionToken) -> Result<User, AuthError> {
    let session = self
      .session_repo
      .find_by_token_hash(&token.hash())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      self.session_repo.delete(session.id).await?;
      return Err(AuthError::InvalidSession);
    }

    let user = self
      .user_repo
      .find_by_id(session.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    self.session_repo.touch(session.id).await?;

    Ok(user)
  }

  async fn open_session(&self, user: &User) -> Result<(Session, SessionToken), AuthError> {
    let token = SessionToken::generate();
    let session = Session::with_duration(user.id, token.hash().into_inner(), self.session_ttl);
    let session = self.session_repo.create(session).await?;

    Ok((session, token))
  }
}
