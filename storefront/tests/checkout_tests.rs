// storefront/tests/checkout_tests.rs
mod common;

use common::*;
use course_storefront::models::{ListKind, Role};
use course_storefront::pipelines::contexts::CheckoutCtxData;
use course_storefront::services::CourseLists;
use course_storefront::{AppError, AppState, RequestContext};
use serial_test::serial;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use storeflow::{ContextData, PipelineResult};

async fn checkout(state: &AppState, ctx: &RequestContext, point: &str) -> (Result<PipelineResult, AppError>, CheckoutCtxData) {
  let ctx_data = ContextData::new(CheckoutCtxData::new(state.store.clone(), ctx.clone(), point.to_string()));
  let result = state.flows.run(ctx_data.clone()).await;
  let data = ctx_data.read().clone();
  (result, data)
}

#[tokio::test]
#[serial]
async fn checkout_totals_cart_and_clears_it() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let sql = course(store, "SQL", 1500).await;

  let cart = CourseLists::cart(store);
  cart.add(buyer.user_id, &rust).await.unwrap();
  cart.add(buyer.user_id, &sql).await.unwrap();

  let (result, data) = checkout(&state, &buyer, FAMA).await;
  assert_eq!(result.unwrap(), PipelineResult::Completed);
  assert!(data.cart_cleared);

  let order = data.order.expect("order created");
  assert_eq!(order.total_price_cents, 2500);
  assert_eq!(order.delivery_point, FAMA);
  assert_eq!(order.lines.len(), 2);

  assert!(cart.fetch_by_user(buyer.user_id).await.unwrap().is_none());
  let orders = store.list_orders(Some(buyer.user_id)).await.unwrap();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].id, order.id);
}

#[tokio::test]
#[serial]
async fn checkout_without_cart_is_empty_cart_and_writes_nothing() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;

  let (result, data) = checkout(&state, &buyer, FAMA).await;
  assert!(matches!(result, Err(AppError::EmptyCart)));
  assert!(data.order.is_none());
  assert!(store.list_orders(None).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn checkout_with_emptied_cart_is_empty_cart() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let cart = CourseLists::cart(store);
  cart.add(buyer.user_id, &rust).await.unwrap();
  cart.remove(buyer.user_id, rust.id).await.unwrap();

  let (result, _) = checkout(&state, &buyer, FAMA).await;
  assert!(matches!(result, Err(AppError::EmptyCart)));
  assert!(store.list_orders(None).await.unwrap().is_empty());
  assert!(store.find_list(ListKind::Cart, buyer.user_id).await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn unknown_delivery_point_is_rejected_before_touching_the_cart() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  CourseLists::cart(store).add(buyer.user_id, &rust).await.unwrap();

  for point in ["", "   ", "Tallinn central"] {
    let (result, _) = checkout(&state, &buyer, point).await;
    assert!(matches!(result, Err(AppError::Validation(_))), "point {:?}", point);
  }
  assert!(store.list_orders(None).await.unwrap().is_empty());
  assert_eq!(
    store.find_list(ListKind::Cart, buyer.user_id).await.unwrap().unwrap().courses.len(),
    1
  );
}

#[tokio::test]
#[serial]
async fn deleted_courses_are_dropped_and_live_prices_are_used() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let kept = course(store, "Kept", 1000).await;
  let gone = course(store, "Gone", 700).await;

  let cart = CourseLists::cart(store);
  cart.add(buyer.user_id, &kept).await.unwrap();
  cart.add(buyer.user_id, &gone).await.unwrap();

  store.delete_course(gone.id).await.unwrap();
  let mut repriced = kept.clone();
  repriced.price_cents = 1200;
  store.update_course(&repriced).await.unwrap();

  let (result, data) = checkout(&state, &buyer, "  Narva magamarket omniva pacautomat ").await;
  result.unwrap();
  let order = data.order.unwrap();
  assert_eq!(order.total_price_cents, 1200);
  assert_eq!(order.lines.len(), 1);
  assert_eq!(order.lines[0].course_id, kept.id);
  assert_eq!(order.delivery_point, "Narva magamarket omniva pacautomat");
  assert_eq!(data.dropped_course_ids, vec![gone.id]);
}

#[tokio::test]
#[serial]
async fn cart_of_only_deleted_courses_is_empty_cart() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let gone = course(store, "Gone", 700).await;
  CourseLists::cart(store).add(buyer.user_id, &gone).await.unwrap();
  store.delete_course(gone.id).await.unwrap();

  let (result, _) = checkout(&state, &buyer, FAMA).await;
  assert!(matches!(result, Err(AppError::EmptyCart)));
  assert!(store.list_orders(None).await.unwrap().is_empty());
  assert!(store.find_list(ListKind::Cart, buyer.user_id).await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn duplicate_cart_entries_are_each_charged() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let cart = CourseLists::cart(store);
  cart.add(buyer.user_id, &rust).await.unwrap();
  cart.add(buyer.user_id, &rust).await.unwrap();

  let (_, data) = checkout(&state, &buyer, FAMA).await;
  let order = data.order.unwrap();
  assert_eq!(order.lines.len(), 2);
  assert_eq!(order.total_price_cents, 2000);
}

#[tokio::test]
#[serial]
async fn cart_clear_failure_keeps_order_and_reports_cart_not_cleared() {
  let flaky = Arc::new(FlakyStore::new());
  let state = state_with_store(flaky.clone());
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let rust = course(store, "Rust", 1000).await;
  let cart = CourseLists::cart(store);
  cart.add(buyer.user_id, &rust).await.unwrap();
  flaky.failing_list_deletes.store(1, Ordering::SeqCst);

  let (result, data) = checkout(&state, &buyer, FAMA).await;
  assert_eq!(result.unwrap(), PipelineResult::Completed);
  assert!(!data.cart_cleared);

  let order = data.order.expect("order kept");
  assert_eq!(order.total_price_cents, 1000);
  let orders = store.list_orders(Some(buyer.user_id)).await.unwrap();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].id, order.id);

  let still_there = cart.fetch_by_user(buyer.user_id).await.unwrap().expect("cart kept");
  assert_eq!(still_there.courses.len(), 1);
  assert_eq!(flaky.failing_list_deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[serial]
async fn checkout_total_past_i64_is_rejected_without_writes() {
  let state = test_state();
  let store = state.store.as_ref();
  let buyer = signed_in(store, "buyer", Role::User).await;
  let cart = CourseLists::cart(store);
  for title in ["Gold", "Platinum"] {
    let pricey = course(store, title, i64::MAX / 2 + 1).await;
    cart.add(buyer.user_id, &pricey).await.unwrap();
  }

  let (result, data) = checkout(&state, &buyer, FAMA).await;
  assert!(matches!(result, Err(AppError::Validation(_))));
  assert!(data.order.is_none());
  assert!(store.list_orders(None).await.unwrap().is_empty());
  assert!(cart.fetch_by_user(buyer.user_id).await.unwrap().is_some());
}
