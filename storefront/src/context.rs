// storefront/src/context.rs

use crate::errors::AppError;
use crate::models::{Role, User};
use uuid::Uuid;

/// The authenticated caller, resolved from the bearer token and handed to
/// every service call that needs an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
  pub user_id: Uuid,
  pub username: String,
  pub role: Role,
  pub session_token: String,
}

impl RequestContext {
  pub fn for_user(user: &User, session_token: impl Into<String>) -> Self {
    Self {
      user_id: user.id,
      username: user.username.clone(),
      role: user.role,
      session_token: session_token.into(),
    }
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }

  pub fn require_admin(&self, action: &str) -> Result<(), AppError> {
    if self.is_admin() {
      Ok(())
    } else {
      tracing::warn!(user_id = %self.user_id, action, "Admin-only action refused.");
      Err(AppError::Forbidden(format!("Only administrators may {}.", action)))
    }
  }
}
