// storefront/src/pipelines/register_pipeline.rs

use crate::errors::AppError;
use crate::models::User;
use crate::pipelines::contexts::RegisterCtxData;
use crate::services::auth_service;
use storeflow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

/// Registration of users and, for admin callers, of further administrators.
/// The role comes from the context; the caller checks who may ask for it.
pub fn register_registration_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<RegisterCtxData, AppError>::new(&[
    ("validate_registration_input", false, None),
    ("ensure_username_free", false, None),
    ("hash_registration_password", false, None),
    ("persist_user", false, None),
  ]);

  p.on_root("validate_registration_input", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (username, password) = {
        let guard = ctx_data.read();
        (guard.username.clone(), guard.password.clone())
      };
      let username = auth_service::validate_credentials(&username, &password)?;
      ctx_data.write().username = username;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("ensure_username_free", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (store, username) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.username.clone())
      };
      if store.find_user_by_username(&username).await?.is_some() {
        warn!(%username, "Registration refused: username taken.");
        return Err(AppError::Validation("Username is already taken.".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("hash_registration_password", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let password = { ctx_data.read().password.clone() };
      let hash = auth_service::hash_password(&password)?;
      {
        let mut guard = ctx_data.write();
        guard.password_hash = Some(hash);
        guard.password.clear();
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("persist_user", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (store, user) = {
        let guard = ctx_data.read();
        let hash = guard.password_hash.clone().ok_or_else(|| {
          event!(Level::ERROR, "Password hash missing when persisting user. Pipeline logic error.");
          AppError::Internal("Password hash unexpectedly missing.".to_string())
        })?;
        (guard.store.clone(), User::new(guard.username.clone(), hash, guard.role))
      };

      // A concurrent registration can still win the race; the store rejects it.
      store.insert_user(&user).await?;
      info!(user_id = %user.id, role = ?user.role, "User registered.");
      ctx_data.write().created_user = Some(user);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  tracing::info!("Registration pipeline registered.");
}
