// storefront/src/pipelines/checkout_pipeline.rs

//! Cart to order. Courses are re-resolved from the catalog at checkout, so
//! the order carries current prices; entries whose course has been deleted
//! are dropped. Persisting the order and clearing the cart are separate
//! writes: if the clear fails the order stands.

use crate::errors::AppError;
use crate::models::{known_delivery_point, Order, OrderLine};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::CourseLists;
use std::collections::HashMap;
use storeflow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{error, info, warn};

pub fn register_checkout_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_delivery_point", false, None),
    ("load_cart", false, None),
    ("resolve_cart_courses", false, None),
    ("persist_order", false, None),
    ("clear_cart", false, None),
  ]);

  p.on_root("validate_delivery_point", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let raw = { ctx_data.read().delivery_point.clone() };
      if raw.trim().is_empty() {
        return Err(AppError::Validation("A delivery point is required.".to_string()));
      }
      let Some(point) = known_delivery_point(&raw) else {
        warn!(delivery_point = %raw, "Unknown delivery point.");
        return Err(AppError::Validation(format!("Unknown delivery point '{}'.", raw.trim())));
      };
      ctx_data.write().delivery_point = point.to_string();
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("load_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, user_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.request.user_id)
      };

      let cart = CourseLists::cart(store.as_ref()).fetch_by_user(user_id).await?;
      match cart {
        Some(cart) if !cart.is_empty() => {
          info!(%user_id, entries = cart.courses.len(), "Cart loaded for checkout.");
          ctx_data.write().cart = Some(cart);
          Ok::<_, AppError>(PipelineControl::Continue)
        }
        _ => {
          warn!(%user_id, "Checkout with an empty cart.");
          Err(AppError::EmptyCart)
        }
      }
    })
  });

  p.on_root("resolve_cart_courses", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, course_ids) = {
        let guard = ctx_data.read();
        let ids: Vec<_> = guard
          .cart
          .as_ref()
          .map(|c| c.courses.iter().map(|s| s.course_id).collect())
          .unwrap_or_default();
        (guard.store.clone(), ids)
      };

      let live: HashMap<_, _> = store
        .find_courses(&course_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

      let mut lines = Vec::with_capacity(course_ids.len());
      let mut dropped = Vec::new();
      for course_id in course_ids {
        match live.get(&course_id) {
          Some(course) => lines.push(OrderLine::from(course)),
          None => {
            warn!(%course_id, "Cart entry refers to a deleted course; dropping it.");
            dropped.push(course_id);
          }
        }
      }

      if lines.is_empty() {
        return Err(AppError::EmptyCart);
      }
      {
        let mut guard = ctx_data.write();
        guard.lines = lines;
        guard.dropped_course_ids = dropped;
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("persist_order", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, order) = {
        let guard = ctx_data.read();
        let order = Order::new(guard.request.user_id, guard.lines.clone(), guard.delivery_point.clone())?;
        (guard.store.clone(), order)
      };

      store.insert_order(&order).await?;
      info!(
        order_id = %order.id,
        total_price_cents = order.total_price_cents,
        delivery_point = %order.delivery_point,
        "Order created."
      );
      ctx_data.write().order = Some(order);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("clear_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, user_id, order_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.request.user_id, guard.order.as_ref().map(|o| o.id))
      };

      match CourseLists::cart(store.as_ref()).clear(user_id).await {
        Ok(_) => ctx_data.write().cart_cleared = true,
        Err(e) => {
          error!(?order_id, %user_id, error = %e, "Order saved but the cart could not be cleared.");
        }
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  tracing::info!("Checkout pipeline registered.");
}
