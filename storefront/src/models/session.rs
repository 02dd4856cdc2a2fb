// storefront/src/models/session.rs

use crate::errors::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
  pub token: String,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn new(token: String, user_id: Uuid, ttl: Duration) -> Result<Self> {
    let created_at = Utc::now();
    let expires_at = created_at
      .checked_add_signed(ttl)
      .ok_or_else(|| AppError::Internal(format!("Session lifetime {} is out of range.", ttl)))?;
    Ok(Self {
      token,
      user_id,
      created_at,
      expires_at,
    })
  }

  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }
}
