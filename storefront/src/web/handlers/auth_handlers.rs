// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storeflow::ContextData;
use tracing::{info, instrument, warn};

use super::run_pipeline;
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::models::Role;
use crate::pipelines::contexts::{RegisterCtxData, SigninCtxData};
use crate::services::auth_service;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct CredentialsPayload {
  pub username: String,
  pub password: String,
}

async fn register_with_role(
  app_state: &AppState,
  payload: CredentialsPayload,
  role: Role,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(RegisterCtxData::new(
    app_state.store.clone(),
    payload.username,
    payload.password,
    role,
  ));
  run_pipeline(app_state, ctx_data.clone()).await?;

  let user = ctx_data.read().created_user.clone().ok_or_else(|| {
    warn!("Registration pipeline completed but no user was set in context.");
    AppError::Internal("Registration completed without creating a user.".to_string())
  })?;

  Ok(HttpResponse::Created().json(json!({
    "message": "User created successfully.",
    "userId": user.id,
    "username": user.username,
    "role": user.role,
  })))
}

#[instrument(name = "handler::register", skip(app_state, req_payload), fields(username = %req_payload.username))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  register_with_role(&app_state, req_payload.into_inner(), Role::User).await
}

#[instrument(
  name = "handler::create_admin",
  skip(app_state, req_payload, ctx),
  fields(requested_by = %ctx.user_id, username = %req_payload.username)
)]
pub async fn create_admin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.require_admin("create administrators")?;
  register_with_role(&app_state, req_payload.into_inner(), Role::Admin).await
}

#[instrument(name = "handler::login", skip(app_state, req_payload), fields(username = %req_payload.username))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ttl = chrono::Duration::try_hours(app_state.config.session_ttl_hours).ok_or_else(|| {
    AppError::Config(format!(
      "SESSION_TTL_HOURS {} is out of range",
      app_state.config.session_ttl_hours
    ))
  })?;
  let ctx_data = ContextData::new(SigninCtxData::new(
    app_state.store.clone(),
    payload.username,
    payload.password,
    ttl,
  ));
  run_pipeline(&app_state, ctx_data.clone()).await?;

  let guard = ctx_data.read();
  let (user, session) = match (guard.user.as_ref(), guard.session.as_ref()) {
    (Some(user), Some(session)) => (user, session),
    _ => {
      warn!("Sign-in pipeline completed without a user or session in context.");
      return Err(AppError::Internal("Sign-in completed without a session.".to_string()));
    }
  };

  info!(user_id = %user.id, "Sign-in successful.");
  Ok(HttpResponse::Ok().json(json!({
    "token": session.token,
    "expiresAt": session.expires_at,
    "userId": user.id,
    "username": user.username,
    "role": user.role,
  })))
}

#[instrument(name = "handler::logout", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn logout_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
  auth_service::sign_out(app_state.store.as_ref(), &ctx).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out." })))
}
