// storefront/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use course_storefront::config::AppConfig;
use course_storefront::models::{Comment, Course, CourseDraft, CourseList, ListKind, Order, Role, Session, User};
use course_storefront::services::auth_service;
use course_storefront::store::{MemoryStore, Store};
use course_storefront::{AppError, AppState, RequestContext, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

pub const FAMA: &str = "Narva fama omniva pacautomat";
pub const PASSWORD: &str = "correct horse battery";

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn test_state() -> AppState {
  state_with_store(Arc::new(MemoryStore::new()))
}

pub fn state_with_store(store: Arc<dyn Store>) -> AppState {
  setup_tracing();
  AppState::new(store, AppConfig::default())
}

/// Inserts a user with a live session and returns the caller context.
pub async fn signed_in(store: &dyn Store, username: &str, role: Role) -> RequestContext {
  let user = User::new(username, auth_service::hash_password(PASSWORD).unwrap(), role);
  store.insert_user(&user).await.unwrap();
  let token = auth_service::generate_session_token();
  store
    .insert_session(&Session::new(token.clone(), user.id, chrono::Duration::hours(1)).unwrap())
    .await
    .unwrap();
  RequestContext::for_user(&user, token)
}

pub async fn course(store: &dyn Store, title: &str, price_cents: i64) -> Course {
  let course = Course::from_draft(CourseDraft {
    title: title.to_string(),
    price_cents,
    img: format!("{}.png", title),
    description: format!("All about {}", title),
    category: "programming".to_string(),
  });
  store.insert_course(&course).await.unwrap();
  course
}

/// Delegates to a `MemoryStore`, failing selected order and list operations.
#[derive(Default)]
pub struct FlakyStore {
  inner: MemoryStore,
  /// Upcoming `update_order` calls that fail.
  pub failing_updates: AtomicU32,
  /// Upcoming `delete_list` calls that fail.
  pub failing_list_deletes: AtomicU32,
  /// Orders whose reads always fail.
  pub broken_orders: Mutex<HashSet<Uuid>>,
  pub update_calls: AtomicU32,
}

impl FlakyStore {
  pub fn new() -> Self {
    Self::default()
  }
}

fn injected(what: &str) -> AppError {
  AppError::Internal(format!("injected failure: {}", what))
}

/// Consumes one pending failure from `counter`, if any.
fn take_one(counter: &AtomicU32) -> bool {
  counter
    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
    .is_ok()
}

#[async_trait]
impl Store for FlakyStore {
  async fn insert_user(&self, user: &User) -> Result<()> {
    self.inner.insert_user(user).await
  }
  async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
    self.inner.find_user(user_id).await
  }
  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    self.inner.find_user_by_username(username).await
  }
  async fn insert_session(&self, session: &Session) -> Result<()> {
    self.inner.insert_session(session).await
  }
  async fn find_session(&self, token: &str) -> Result<Option<Session>> {
    self.inner.find_session(token).await
  }
  async fn delete_session(&self, token: &str) -> Result<bool> {
    self.inner.delete_session(token).await
  }
  async fn list_courses(&self) -> Result<Vec<Course>> {
    self.inner.list_courses().await
  }
  async fn search_courses(&self, term: &str, category: Option<&str>) -> Result<Vec<Course>> {
    self.inner.search_courses(term, category).await
  }
  async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>> {
    self.inner.find_course(course_id).await
  }
  async fn find_courses(&self, course_ids: &[Uuid]) -> Result<Vec<Course>> {
    self.inner.find_courses(course_ids).await
  }
  async fn insert_course(&self, course: &Course) -> Result<()> {
    self.inner.insert_course(course).await
  }
  async fn update_course(&self, course: &Course) -> Result<bool> {
    self.inner.update_course(course).await
  }
  async fn push_comment(&self, course_id: Uuid, comment: &Comment) -> Result<bool> {
    self.inner.push_comment(course_id, comment).await
  }
  async fn delete_course(&self, course_id: Uuid) -> Result<bool> {
    self.inner.delete_course(course_id).await
  }
  async fn find_list(&self, kind: ListKind, user_id: Uuid) -> Result<Option<CourseList>> {
    self.inner.find_list(kind, user_id).await
  }
  async fn save_list(&self, list: &CourseList) -> Result<()> {
    self.inner.save_list(list).await
  }
  async fn delete_list(&self, kind: ListKind, user_id: Uuid) -> Result<bool> {
    if take_one(&self.failing_list_deletes) {
      return Err(injected("delete_list"));
    }
    self.inner.delete_list(kind, user_id).await
  }
  async fn insert_order(&self, order: &Order) -> Result<()> {
    self.inner.insert_order(order).await
  }
  async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>> {
    let broken = self.broken_orders.lock().contains(&order_id);
    if broken {
      return Err(injected("find_order"));
    }
    self.inner.find_order(order_id).await
  }
  async fn list_orders(&self, user_id: Option<Uuid>) -> Result<Vec<Order>> {
    self.inner.list_orders(user_id).await
  }
  async fn order_ids_with_course(&self, course_id: Uuid) -> Result<Vec<Uuid>> {
    self.inner.order_ids_with_course(course_id).await
  }
  async fn update_order(&self, order: &Order) -> Result<bool> {
    self.update_calls.fetch_add(1, Ordering::SeqCst);
    if take_one(&self.failing_updates) {
      return Err(injected("update_order"));
    }
    self.inner.update_order(order).await
  }
  async fn delete_order(&self, order_id: Uuid) -> Result<bool> {
    self.inner.delete_order(order_id).await
  }
}
