// storefront/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::models::Session;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use storeflow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

const BAD_CREDENTIALS: &str = "Invalid username or password.";

pub fn register_signin_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_user_by_username", false, None),
    ("verify_user_password", false, None),
    ("issue_session", false, None),
  ]);

  p.on_root("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (username, password_is_empty) = {
        let guard = ctx_data.read();
        (guard.username.trim().to_string(), guard.password.is_empty())
      };
      if username.is_empty() || password_is_empty {
        warn!("Sign-in attempted with missing credentials.");
        return Err(AppError::Validation("Username and password are required.".to_string()));
      }
      ctx_data.write().username = username;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("fetch_user_by_username", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (store, username) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.username.clone())
      };

      match store.find_user_by_username(&username).await? {
        Some(user) => {
          event!(Level::DEBUG, user_id = %user.id, "User found for sign-in.");
          ctx_data.write().user = Some(user);
          Ok::<_, AppError>(PipelineControl::Continue)
        }
        None => {
          warn!(%username, "Sign-in for unknown username.");
          Err(AppError::Auth(BAD_CREDENTIALS.to_string()))
        }
      }
    })
  });

  p.on_root("verify_user_password", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (stored_hash, password, user_id) = {
        let guard = ctx_data.read();
        let user = guard
          .user
          .as_ref()
          .ok_or_else(|| AppError::Internal("User missing before password check.".to_string()))?;
        (user.password_hash.clone(), guard.password.clone(), user.id)
      };

      let matches = auth_service::verify_password(&stored_hash, &password)?;
      ctx_data.write().password.clear();
      if !matches {
        warn!(%user_id, "Password mismatch on sign-in.");
        return Err(AppError::Auth(BAD_CREDENTIALS.to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("issue_session", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (store, user_id, ttl) = {
        let guard = ctx_data.read();
        let user_id = guard
          .user
          .as_ref()
          .map(|u| u.id)
          .ok_or_else(|| AppError::Internal("User missing before session issue.".to_string()))?;
        (guard.store.clone(), user_id, guard.session_ttl)
      };

      let session = Session::new(auth_service::generate_session_token(), user_id, ttl)?;
      store.insert_session(&session).await?;
      info!(%user_id, expires_at = %session.expires_at, "Session issued.");
      ctx_data.write().session = Some(session);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  tracing::info!("Sign-in pipeline registered.");
}
