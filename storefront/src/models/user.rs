// storefront/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub username: String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role: Role,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
    Self {
      id: Uuid::new_v4(),
      username: username.into(),
      password_hash: password_hash.into(),
      role,
      created_at: Utc::now(),
    }
  }
}
