// storefront/src/services/order_service.rs

//! Order listing, deletion and the per-order repair run when a course
//! disappears. Checkout itself is a pipeline.

use crate::context::RequestContext;
use crate::errors::{AppError, Result};
use crate::models::{sum_cents, Order, OrderSummary};
use crate::store::Store;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// What reconciling one order did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
  /// No course remained, so the order was removed.
  Deleted,
  Repriced { total_price_cents: i64 },
  /// The order was gone or no longer held the course.
  Unaffected,
}

pub async fn list_own(store: &dyn Store, ctx: &RequestContext) -> Result<Vec<OrderSummary>> {
  let orders = store.list_orders(Some(ctx.user_id)).await?;
  Ok(orders.iter().map(Order::summary).collect())
}

pub async fn list_all(store: &dyn Store, ctx: &RequestContext) -> Result<Vec<OrderSummary>> {
  ctx.require_admin("list every order")?;
  let orders = store.list_orders(None).await?;
  Ok(orders.iter().map(Order::summary).collect())
}

/// Deletes an order owned by the caller, or any order for an administrator.
/// Someone else's order is reported as missing.
#[instrument(name = "order_service::delete", skip(store, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete(store: &dyn Store, ctx: &RequestContext, order_id: Uuid) -> Result<()> {
  let not_found = || AppError::NotFound(format!("Order {} not found.", order_id));
  let order = store.find_order(order_id).await?.ok_or_else(not_found)?;

  if order.user_id != ctx.user_id && !ctx.is_admin() {
    warn!(owner = %order.user_id, "Refusing to delete another user's order.");
    return Err(not_found());
  }

  if !store.delete_order(order_id).await? {
    return Err(not_found());
  }
  info!("Order deleted.");
  Ok(())
}

/// Re-reads the order, strips `removed_course_id` and either deletes the
/// order or reprices it from the live catalog. Lines whose course no longer
/// exists are dropped as well. Safe to call again after a failure.
#[instrument(name = "order_service::reconcile_after_course_removal", skip(store))]
pub async fn reconcile_after_course_removal(
  store: &dyn Store,
  order_id: Uuid,
  removed_course_id: Uuid,
) -> Result<Reconciliation> {
  let Some(mut order) = store.find_order(order_id).await? else {
    debug!("Order already gone.");
    return Ok(Reconciliation::Unaffected);
  };
  if order.remove_course(removed_course_id) == 0 {
    return Ok(Reconciliation::Unaffected);
  }

  if !order.lines.is_empty() {
    let ids: Vec<Uuid> = order.lines.iter().map(|l| l.course_id).collect();
    let live_prices: HashMap<Uuid, i64> = store
      .find_courses(&ids)
      .await?
      .into_iter()
      .map(|c| (c.id, c.price_cents))
      .collect();

    order.lines.retain(|l| live_prices.contains_key(&l.course_id));
    let remaining = order.lines.iter().filter_map(|l| live_prices.get(&l.course_id).copied());
    order.total_price_cents = sum_cents(remaining)?;
  }

  if order.lines.is_empty() {
    store.delete_order(order_id).await?;
    info!("Order emptied by course removal and deleted.");
    return Ok(Reconciliation::Deleted);
  }

  store.update_order(&order).await?;
  info!(total_price_cents = order.total_price_cents, "Order repriced after course removal.");
  Ok(Reconciliation::Repriced {
    total_price_cents: order.total_price_cents,
  })
}
