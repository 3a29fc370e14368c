use argon2::password_hash::{
  self, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id hasher that keeps the expensive work off the async executor
///
/// Defaults: 19 MiB memory, 2 passes, 1 lane.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  params: Params,
}

impl Argon2PasswordHasher {
  pub const MEMORY_COST_KIB: u32 = 19456;
  pub const TIME_COST: u32 = 2;
  pub const PARALLELISM: u32 = 1;
  const OUTPUT_LEN: usize = 32;

  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(Self::MEMORY_COST_KIB, Self::TIME_COST, Self::PARALLELISM)
  }

  pub fn with_params(
    memory_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
  ) -> Result<Self, AuthError> {
    let params = Params::new(
      memory_cost_kib,
      time_cost,
      parallelism,
      Some(Self::OUTPUT_LEN),
    )
    .map_err(|e| HashError::InvalidParams(e.to_string()))?;

    Ok(Self { params })
  }

  fn argon2(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
  }
}

async fn run_blocking<T, F>(job: F) -> Result<T, AuthError>
where
  F: FnOnce() -> Result<T, HashError> + Send + 'static,
  T: Send + 'static,
{
  task::spawn_blocking(job)
    .await
    .map_err(|e| HashError::TaskFailed(e.to_string()))?
    .map_err(AuthError::from)
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let params = self.params.clone();
    let plain = Zeroizing::new(password.as_str().to_owned());

    let phc = run_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      Self::argon2(params)
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashingFailed(e.to_string()))
    })
    .await?;

    Ok(PasswordHash::from_hash(phc)?)
  }

  /// A mismatch is `Ok(false)`; only broken hashes or parameters are errors
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let params = self.params.clone();
    let plain = Zeroizing::new(password.as_str().to_owned());
    let stored = hashed_password.as_str().to_owned();

    run_blocking(move || {
      let parsed = PhcHash::new(&stored).map_err(|e| HashError::MalformedHash(e.to_string()))?;

      match Self::argon2(params).verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::HashingFailed(e.to_string())),
      }
    })
    .await
  }
}
