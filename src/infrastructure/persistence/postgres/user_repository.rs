use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::{AuthError, Email, User, ports::UserRepository};
use crate::domain::errors::{RepositoryError, UNIQUE_VIOLATION};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, FromRow)]
struct UserRow {
  id: Uuid,
  name: String,
  email: String,
  password_hash: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(
      row.id,
      row.name,
      row.email,
      row.password_hash,
      row.created_at,
      row.updated_at,
    )
  }
}

/// Registration races end on the unique email index
fn map_insert_error(e: sqlx::Error) -> AuthError {
  if let sqlx::Error::Database(db_err) = &e {
    if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
      && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
    {
      return AuthError::EmailAlreadyExists;
    }
  }
  AuthError::Repository(RepositoryError::from(e))
}

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      r#"
      INSERT INTO users ({USER_COLUMNS})
      VALUES ($1, $2, $3, $4, $5, $6)
      RETURNING {USER_COLUMNS}
      "#
    ))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(map_insert_error)?;

    Ok(row.into())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(User::from))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(User::from))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_db::setup_test_db;

  fn user(email: &str) -> User {
    User::new(
      "Ana López".to_string(),
      email.to_string(),
      "$argon2id$v=19$m=64,t=1,p=1$c29tZXNhbHQ$aGFzaA".to_string(),
    )
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_create_and_find_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let created = repo.create(user("ana@example.com")).await.unwrap();

    let by_email = repo
      .find_by_email(&Email::new("ANA@example.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_email.name, "Ana López");

    assert!(repo.find_by_id(created.id).await.unwrap().is_some());
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_duplicate_email_is_reported_as_taken() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(user("ana@example.com")).await.unwrap();
    let result = repo.create(user("ana@example.com")).await;

    assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
  }
}
