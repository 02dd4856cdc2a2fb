// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use storeflow::ContextData;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{run_pipeline, see_other};
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::models::{CourseList, CourseSnapshot, ListKind, DELIVERY_POINTS};
use crate::pipelines::contexts::{AddToListCtxData, CheckoutCtxData};
use crate::services::CourseLists;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct AddToCartPayload {
  pub id: Uuid,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
  #[serde(default)]
  pub delivery_point: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub courses: Vec<CourseSnapshot>,
  pub total_price_cents: i64,
  pub delivery_points: [&'static str; 3],
}

impl CartView {
  fn from_list(list: Option<CourseList>) -> Result<Self, AppError> {
    let (courses, total_price_cents) = match list {
      Some(list) => {
        let total = list.total_cents()?;
        (list.courses, total)
      }
      None => (Vec::new(), 0),
    };
    Ok(Self {
      courses,
      total_price_cents,
      delivery_points: DELIVERY_POINTS,
    })
  }
}

#[instrument(name = "handler::view_cart", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn view_cart_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
  let cart = CourseLists::cart(app_state.store.as_ref())
    .fetch_by_user(ctx.user_id)
    .await?;
  Ok(HttpResponse::Ok().json(CartView::from_list(cart)?))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload, ctx),
  fields(user_id = %ctx.user_id, course_id = %req_payload.id)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(AddToListCtxData::new(
    app_state.store.clone(),
    ListKind::Cart,
    ctx.user_id,
    req_payload.id,
  ));
  run_pipeline(&app_state, ctx_data).await?;
  Ok(see_other("/card").finish())
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let course_id = path.into_inner();
  let cart = CourseLists::cart(app_state.store.as_ref())
    .remove(ctx.user_id, course_id)
    .await?;
  Ok(HttpResponse::Ok().json(CartView::from_list(Some(cart))?))
}

#[instrument(
  name = "handler::checkout",
  skip(app_state, req_payload, ctx),
  fields(user_id = %ctx.user_id, delivery_point = %req_payload.delivery_point)
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(CheckoutCtxData::new(
    app_state.store.clone(),
    ctx,
    req_payload.into_inner().delivery_point,
  ));
  run_pipeline(&app_state, ctx_data.clone()).await?;

  let guard = ctx_data.read();
  let order = guard.order.as_ref().ok_or_else(|| {
    warn!("Checkout pipeline completed but no order was set in context.");
    AppError::Internal("Checkout completed without an order.".to_string())
  })?;

  info!(order_id = %order.id, cart_cleared = guard.cart_cleared, "Checkout finished.");
  Ok(see_other("/orders").json(json!({
    "order": order.summary(),
    "cartCleared": guard.cart_cleared,
    "droppedCourseIds": guard.dropped_course_ids,
  })))
}
