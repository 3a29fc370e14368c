use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An API user able to obtain bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  /// Lower-cased, unique
  pub email: String,
  /// Argon2id PHC string
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn new(name: String, email: String, password_hash: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      password_hash,
      created_at: now,
      updated_at: now,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      name,
      email,
      password_hash,
      created_at,
      updated_at,
    }
  }
}

/// A bearer-token session. Only the SHA-256 hash of the token is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id: Uuid,
  pub user_id: Uuid,
  pub token_hash: String,
  pub expires_at: DateTime<Utc>,
  pub last_used_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

impl Session {
  pub fn with_duration(user_id: Uuid, token_hash: String, duration: Duration) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      token_hash,
      expires_at: now + duration,
      last_used_at: None,
      created_at: now,
    }
  }

  /// Creates a session from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      user_id,
      token_hash,
      expires_at,
      last_used_at,
      created_at,
    }
  }

  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }
}
