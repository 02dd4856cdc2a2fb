// storefront/tests/orders_and_catalog_tests.rs
mod common;

use common::*;
use course_storefront::models::{CourseDraft, CourseEdit, Order, OrderLine, Role, MAX_PRICE_CENTS};
use course_storefront::services::{catalog_service, order_service};
use course_storefront::AppError;
use serial_test::serial;
use uuid::Uuid;

#[tokio::test]
#[serial]
async fn only_owner_or_admin_may_delete_an_order() {
  let state = test_state();
  let store = state.store.as_ref();
  let owner = signed_in(store, "owner", Role::User).await;
  let stranger = signed_in(store, "stranger", Role::User).await;
  let admin = signed_in(store, "admin", Role::Admin).await;
  let rust = course(store, "Rust", 1000).await;

  let first = Order::new(owner.user_id, vec![OrderLine::from(&rust)], FAMA).unwrap();
  let second = Order::new(owner.user_id, vec![OrderLine::from(&rust)], FAMA).unwrap();
  store.insert_order(&first).await.unwrap();
  store.insert_order(&second).await.unwrap();

  let err = order_service::delete(store, &stranger, first.id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
  assert!(store.find_order(first.id).await.unwrap().is_some());

  let unknown_id = Uuid::new_v4();
  let missing = order_service::delete(store, &stranger, unknown_id).await.unwrap_err();
  assert_eq!(
    err.to_string().replace(&first.id.to_string(), "<id>"),
    missing.to_string().replace(&unknown_id.to_string(), "<id>")
  );

  order_service::delete(store, &owner, first.id).await.unwrap();
  order_service::delete(store, &admin, second.id).await.unwrap();
  assert!(store.list_orders(None).await.unwrap().is_empty());

  let err = order_service::delete(store, &owner, first.id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn listings_are_scoped_and_rendered_from_snapshots() {
  let state = test_state();
  let store = state.store.as_ref();
  let ann = signed_in(store, "ann", Role::User).await;
  let bob = signed_in(store, "bob", Role::User).await;
  let admin = signed_in(store, "admin", Role::Admin).await;
  let rust = course(store, "Rust", 1000).await;

  store
    .insert_order(&Order::new(ann.user_id, vec![OrderLine::from(&rust)], FAMA).unwrap())
    .await
    .unwrap();
  store
    .insert_order(&Order::new(bob.user_id, vec![OrderLine::from(&rust)], FAMA).unwrap())
    .await
    .unwrap();

  // Later catalog changes do not leak into existing orders.
  let mut renamed = rust.clone();
  renamed.title = "Rust 2nd edition".to_string();
  renamed.price_cents = 9999;
  store.update_course(&renamed).await.unwrap();

  let own = order_service::list_own(store, &ann).await.unwrap();
  assert_eq!(own.len(), 1);
  assert_eq!(own[0].courses[0].title, "Rust");
  assert_eq!(own[0].total_price_cents, 1000);
  assert_eq!(own[0].date.split(' ').count(), 4);

  assert!(matches!(
    order_service::list_all(store, &ann).await,
    Err(AppError::Forbidden(_))
  ));
  assert_eq!(order_service::list_all(store, &admin).await.unwrap().len(), 2);
}

#[tokio::test]
#[serial]
async fn search_requires_a_term_and_ignores_case() {
  let state = test_state();
  let store = state.store.as_ref();
  course(store, "Rust Basics", 1000).await;
  course(store, "Advanced SQL", 1500).await;

  for term in [None, Some(""), Some("   ")] {
    assert!(matches!(
      catalog_service::search(store, term, None).await,
      Err(AppError::Validation(_))
    ));
  }

  let hits = catalog_service::search(store, Some("rUsT"), None).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].title, "Rust Basics");

  let none = catalog_service::search(store, Some("rust"), Some("design")).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
#[serial]
async fn course_management_is_admin_only_and_validated() {
  let state = test_state();
  let store = state.store.as_ref();
  let admin = signed_in(store, "admin", Role::Admin).await;
  let user = signed_in(store, "user", Role::User).await;

  let draft = |title: &str, price_cents: i64| CourseDraft {
    title: title.to_string(),
    price_cents,
    img: String::new(),
    description: String::new(),
    category: "dev".to_string(),
  };

  assert!(matches!(
    catalog_service::create(store, &user, draft("Rust", 1000)).await,
    Err(AppError::Forbidden(_))
  ));
  assert!(matches!(
    catalog_service::create(store, &admin, draft("  ", 1000)).await,
    Err(AppError::Validation(_))
  ));
  assert!(matches!(
    catalog_service::create(store, &admin, draft("Rust", -1)).await,
    Err(AppError::Validation(_))
  ));
  assert!(matches!(
    catalog_service::create(store, &admin, draft("Rust", MAX_PRICE_CENTS + 1)).await,
    Err(AppError::Validation(_))
  ));
  assert!(matches!(
    catalog_service::create(store, &admin, draft("Rust", i64::MAX / 2 + 1)).await,
    Err(AppError::Validation(_))
  ));

  let created = catalog_service::create(store, &admin, draft("Rust", 1000)).await.unwrap();
  let edited = catalog_service::edit(
    store,
    &admin,
    CourseEdit {
      id: created.id,
      price_cents: Some(1200),
      ..Default::default()
    },
  )
  .await
  .unwrap();
  assert_eq!(edited.price_cents, 1200);
  assert_eq!(catalog_service::get(store, created.id).await.unwrap().price_cents, 1200);

  let missing = CourseEdit {
    id: Uuid::new_v4(),
    ..Default::default()
  };
  assert!(matches!(
    catalog_service::edit(store, &admin, missing).await,
    Err(AppError::NotFound(_))
  ));
}

#[tokio::test]
#[serial]
async fn comments_are_appended_with_author() {
  let state = test_state();
  let store = state.store.as_ref();
  let ann = signed_in(store, "ann", Role::User).await;
  let rust = course(store, "Rust", 1000).await;

  catalog_service::add_comment(store, &ann, rust.id, "Great course").await.unwrap();
  catalog_service::add_comment(store, &ann, rust.id, "  Second  ").await.unwrap();

  let comments = catalog_service::get(store, rust.id).await.unwrap().comments;
  assert_eq!(comments.len(), 2);
  assert_eq!(comments[0].author, "ann");
  assert_eq!(comments[1].text, "Second");

  assert!(matches!(
    catalog_service::add_comment(store, &ann, rust.id, " ").await,
    Err(AppError::Validation(_))
  ));
  assert!(matches!(
    catalog_service::add_comment(store, &ann, Uuid::new_v4(), "hi").await,
    Err(AppError::NotFound(_))
  ));
}
