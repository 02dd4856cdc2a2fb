// storefront/src/services/auth_service.rs

//! Password hashing, credential rules and session resolution.

use crate::context::RequestContext;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::store::Store;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::Utc;
use rand_core::RngCore;
use tracing::{debug, error, info, instrument, warn};

pub const MIN_PASSWORD_LEN: usize = 8;
const SESSION_TOKEN_BYTES: usize = 32;

#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    error!("Password hashing failed: Password cannot be empty.");
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => {
      debug!("Password hashed successfully.");
      Ok(hash.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing failed: {}", argon_err)))
    }
  }
}

/// `Ok(false)` on a mismatch; errors are reserved for unusable hashes.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display), fields(hash_len = stored_hash.len()))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!("Password verification failed: {}", other)))
    }
  }
}

/// Trims the username and enforces the password length. Returns the trimmed
/// username.
pub fn validate_credentials(username: &str, password: &str) -> Result<String, AppError> {
  let username = username.trim();
  if username.is_empty() {
    return Err(AppError::Validation("Username is required.".to_string()));
  }
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      MIN_PASSWORD_LEN
    )));
  }
  Ok(username.to_string())
}

/// 256 random bits, hex encoded.
pub fn generate_session_token() -> String {
  let mut bytes = [0u8; SESSION_TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Resolves a bearer token to the caller. Unknown and expired tokens (and
/// sessions whose user is gone) are `Auth` failures; an expired session is
/// removed on sight.
#[instrument(name = "auth_service::resolve_session", skip_all)]
pub async fn resolve_session(store: &dyn Store, token: &str) -> Result<RequestContext, AppError> {
  let unauthorized = || AppError::Auth("Invalid or expired session.".to_string());

  let session = store.find_session(token).await?.ok_or_else(unauthorized)?;
  if session.is_expired_at(Utc::now()) {
    warn!(user_id = %session.user_id, "Expired session presented.");
    store.delete_session(token).await?;
    return Err(unauthorized());
  }

  let user = store.find_user(session.user_id).await?.ok_or_else(|| {
    warn!(user_id = %session.user_id, "Session refers to a missing user.");
    unauthorized()
  })?;
  Ok(RequestContext::for_user(&user, token))
}

#[instrument(name = "auth_service::sign_out", skip_all, fields(user_id = %ctx.user_id))]
pub async fn sign_out(store: &dyn Store, ctx: &RequestContext) -> Result<(), AppError> {
  store.delete_session(&ctx.session_token).await?;
  info!("Session closed.");
  Ok(())
}

/// Creates the configured administrator unless the username already exists.
/// Returns whether an account was created.
#[instrument(name = "auth_service::ensure_admin", skip(store, password))]
pub async fn ensure_admin(store: &dyn Store, username: &str, password: &str) -> Result<bool, AppError> {
  let username = validate_credentials(username, password)?;
  if let Some(existing) = store.find_user_by_username(&username).await? {
    if existing.role != Role::Admin {
      warn!(%username, "Bootstrap admin name is held by a regular user; leaving it unchanged.");
    }
    return Ok(false);
  }
  let user = User::new(username, hash_password(password)?, Role::Admin);
  store.insert_user(&user).await?;
  info!(user_id = %user.id, "Bootstrap administrator created.");
  Ok(true)
}
