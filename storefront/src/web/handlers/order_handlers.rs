// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::see_other;
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;

#[instrument(name = "handler::list_orders", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_own(app_state.store.as_ref(), &ctx).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::list_all_orders", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_all_orders_handler(
  app_state: web::Data<AppState>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_all(app_state.store.as_ref(), &ctx).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::delete_order", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  order_service::delete(app_state.store.as_ref(), &ctx, path.into_inner()).await?;
  Ok(see_other("/orders").finish())
}
