// storefront/tests/course_removal_tests.rs
mod common;

use common::*;
use course_storefront::models::{Order, OrderLine, Role};
use course_storefront::pipelines::contexts::{CourseRemovalCtxData, CourseRemovalReport};
use course_storefront::store::Store;
use course_storefront::{AppError, AppState, RequestContext};
use serial_test::serial;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use storeflow::ContextData;
use uuid::Uuid;

async fn remove_course(
  state: &AppState,
  ctx: &RequestContext,
  course_id: Uuid,
  max_attempts: u32,
) -> (Result<(), AppError>, CourseRemovalReport) {
  let ctx_data = ContextData::new(CourseRemovalCtxData::new(
    state.store.clone(),
    ctx.clone(),
    course_id,
    max_attempts,
  ));
  let result = state.flows.run(ctx_data.clone()).await.map(|_| ());
  let report = ctx_data.read().report.clone();
  (result, report)
}

async fn place_order(store: &dyn Store, user_id: Uuid, lines: Vec<OrderLine>) -> Order {
  let order = Order::new(user_id, lines, FAMA).unwrap();
  store.insert_order(&order).await.unwrap();
  order
}

#[tokio::test]
#[serial]
async fn order_holding_only_the_removed_course_is_deleted() {
  let state = test_state();
  let store = state.store.as_ref();
  let admin = signed_in(store, "admin", Role::Admin).await;
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let order = place_order(store, buyer.user_id, vec![OrderLine::from(&rust)]).await;

  let (result, report) = remove_course(&state, &admin, rust.id, 3).await;
  result.unwrap();

  assert!(store.find_course(rust.id).await.unwrap().is_none());
  assert!(store.find_order(order.id).await.unwrap().is_none());
  assert_eq!(report.deleted_orders, vec![order.id]);
  assert!(report.repriced_orders.is_empty());
}

#[tokio::test]
#[serial]
async fn remaining_courses_reprice_the_order() {
  let state = test_state();
  let store = state.store.as_ref();
  let admin = signed_in(store, "admin", Role::Admin).await;
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let sql = course(store, "SQL", 1500).await;
  let order = place_order(store, buyer.user_id, vec![OrderLine::from(&rust), OrderLine::from(&sql)]).await;
  assert_eq!(order.total_price_cents, 2500);

  let (result, report) = remove_course(&state, &admin, rust.id, 3).await;
  result.unwrap();

  let repaired = store.find_order(order.id).await.unwrap().unwrap();
  assert_eq!(repaired.total_price_cents, 1500);
  assert_eq!(repaired.lines, vec![OrderLine::from(&sql)]);
  assert_eq!(report.repriced_orders, vec![order.id]);
}

#[tokio::test]
#[serial]
async fn lines_of_previously_deleted_courses_are_dropped_too() {
  let state = test_state();
  let store = state.store.as_ref();
  let admin = signed_in(store, "admin", Role::Admin).await;
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let ghost = course(store, "Ghost", 300).await;
  let sql = course(store, "SQL", 1500).await;
  let order = place_order(
    store,
    buyer.user_id,
    vec![OrderLine::from(&rust), OrderLine::from(&ghost), OrderLine::from(&sql)],
  )
  .await;
  // Removed behind the catalog's back, so no reconciliation ran for it.
  store.delete_course(ghost.id).await.unwrap();

  let (result, _) = remove_course(&state, &admin, rust.id, 3).await;
  result.unwrap();

  let repaired = store.find_order(order.id).await.unwrap().unwrap();
  assert_eq!(repaired.lines.len(), 1);
  assert_eq!(repaired.total_price_cents, 1500);
}

#[tokio::test]
#[serial]
async fn unrelated_orders_are_untouched() {
  let state = test_state();
  let store = state.store.as_ref();
  let admin = signed_in(store, "admin", Role::Admin).await;
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let sql = course(store, "SQL", 1500).await;
  let other = place_order(store, buyer.user_id, vec![OrderLine::from(&sql)]).await;

  let (result, report) = remove_course(&state, &admin, rust.id, 3).await;
  result.unwrap();

  assert_eq!(store.find_order(other.id).await.unwrap().unwrap().total_price_cents, 1500);
  assert!(report.deleted_orders.is_empty() && report.repriced_orders.is_empty());
}

#[tokio::test]
#[serial]
async fn non_admin_cannot_remove_courses() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;

  let (result, _) = remove_course(&state, &buyer, rust.id, 3).await;
  assert!(matches!(result, Err(AppError::Forbidden(_))));
  assert!(store.find_course(rust.id).await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn removing_unknown_course_is_not_found() {
  let state = test_state();
  let admin = signed_in(state.store.as_ref(), "admin", Role::Admin).await;

  let (result, _) = remove_course(&state, &admin, Uuid::new_v4(), 3).await;
  assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn transient_store_failure_is_retried() {
  let flaky = Arc::new(FlakyStore::new());
  let state = state_with_store(flaky.clone());
  let store = state.store.as_ref();
  let admin = signed_in(store, "admin", Role::Admin).await;
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let sql = course(store, "SQL", 1500).await;
  let order = place_order(store, buyer.user_id, vec![OrderLine::from(&rust), OrderLine::from(&sql)]).await;

  flaky.failing_updates.store(2, Ordering::SeqCst);
  let (result, report) = remove_course(&state, &admin, rust.id, 3).await;
  result.unwrap();

  assert_eq!(flaky.update_calls.load(Ordering::SeqCst), 3);
  assert_eq!(report.repriced_orders, vec![order.id]);
  assert_eq!(store.find_order(order.id).await.unwrap().unwrap().total_price_cents, 1500);
}

#[tokio::test]
#[serial]
async fn persistent_failure_is_reported_after_other_orders_are_repaired() {
  let flaky = Arc::new(FlakyStore::new());
  let state = state_with_store(flaky.clone());
  let store = state.store.as_ref();
  let admin = signed_in(store, "admin", Role::Admin).await;
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let broken = place_order(store, buyer.user_id, vec![OrderLine::from(&rust)]).await;
  let healthy = place_order(store, buyer.user_id, vec![OrderLine::from(&rust)]).await;

  flaky.broken_orders.lock().insert(broken.id);
  let (result, report) = remove_course(&state, &admin, rust.id, 2).await;

  assert!(matches!(result, Err(AppError::Internal(_))));
  assert_eq!(report.failed_orders, vec![broken.id]);
  assert_eq!(report.deleted_orders, vec![healthy.id]);
  assert!(store.find_course(rust.id).await.unwrap().is_none());
}
