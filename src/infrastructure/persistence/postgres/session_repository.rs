use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::AuthError;
use crate::domain::errors::RepositoryError;
use crate::domain::auth::ports::SessionRepository;
use crate::domain::auth::value_objects::TokenHash;

#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: Uuid,
  token_hash: String,
  expires_at: DateTime<Utc>,
  last_used_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session::from_db(
      row.id,
      row.user_id,
      row.token_hash,
      row.expires_at,
      row.last_used_at,
      row.created_at,
    )
  }
}

/// PostgreSQL implementation of the SessionRepository trait
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, last_used_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, token_hash, expires_at, last_used_at, created_at
            "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.token_hash)
    .bind(session.expires_at)
    .bind(session.last_used_at)
    .bind(session.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      AuthError::Repository(RepositoryError::from(e))
    })?;

    Ok(row.into())
  }

  async fn find_by_token_hash(&self, token_hash: &TokenHash) -> Result<Option<Session>, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            SELECT id, user_id, token_hash, expires_at, last_used_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
    )
    .bind(token_hash.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn touch(&self, session_id: Uuid) -> Result<(), AuthError> {
    let result = sqlx::query(
      r#"
            UPDATE sessions
            SET last_used_at = NOW()
            WHERE id = $1
            "#,
    )
    .bind(session_id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      tracing::warn!("Session {} not found for activity update", session_id);
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }

    Ok(())
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    sqlx::query(
      r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
    )
    .bind(session_id)
    .execute(&self.pool)
    .await?;

    Ok(())
  }
}
