// storefront/src/web/extractors.rs

use crate::context::RequestContext;
use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  let token = token.trim();
  if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
    Some(token.to_string())
  } else {
    None
  }
}

/// Any handler taking a `RequestContext` requires a live session.
impl FromRequest for RequestContext {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = bearer_token(req);

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let Some(token) = token else {
        warn!("Request without a bearer token.");
        return Err(AppError::Auth("Authentication required.".to_string()));
      };
      auth_service::resolve_session(state.store.as_ref(), &token).await
    })
  }
}
