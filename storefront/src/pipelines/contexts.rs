// storefront/src/pipelines/contexts.rs

//! Data carried through each pipeline. Handlers receive these wrapped in
//! `storeflow::ContextData`.

use crate::context::RequestContext;
use crate::models::{Course, CourseList, ListKind, Order, OrderLine, Role, Session, User};
use crate::store::Store;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct RegisterCtxData {
  pub store: Arc<dyn Store>,
  pub username: String,
  pub password: String,
  pub role: Role,
  pub password_hash: Option<String>,
  pub created_user: Option<User>,
}

impl RegisterCtxData {
  pub fn new(store: Arc<dyn Store>, username: String, password: String, role: Role) -> Self {
    Self {
      store,
      username,
      password,
      role,
      password_hash: None,
      created_user: None,
    }
  }
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub store: Arc<dyn Store>,
  pub username: String,
  pub password: String,
  pub session_ttl: chrono::Duration,
  pub user: Option<User>,
  pub session: Option<Session>,
}

impl SigninCtxData {
  pub fn new(store: Arc<dyn Store>, username: String, password: String, session_ttl: chrono::Duration) -> Self {
    Self {
      store,
      username,
      password,
      session_ttl,
      user: None,
      session: None,
    }
  }
}

/// Adding a catalog course to the caller's cart or favorites.
#[derive(Clone)]
pub struct AddToListCtxData {
  pub store: Arc<dyn Store>,
  pub kind: ListKind,
  pub user_id: Uuid,
  pub course_id: Uuid,
  pub course: Option<Course>,
  pub updated_list: Option<CourseList>,
}

impl AddToListCtxData {
  pub fn new(store: Arc<dyn Store>, kind: ListKind, user_id: Uuid, course_id: Uuid) -> Self {
    Self {
      store,
      kind,
      user_id,
      course_id,
      course: None,
      updated_list: None,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub store: Arc<dyn Store>,
  pub request: RequestContext,
  /// As submitted; replaced by the canonical pickup location once validated.
  pub delivery_point: String,
  pub cart: Option<CourseList>,
  pub lines: Vec<OrderLine>,
  /// Cart entries whose course no longer exists.
  pub dropped_course_ids: Vec<Uuid>,
  pub order: Option<Order>,
  pub cart_cleared: bool,
}

impl CheckoutCtxData {
  pub fn new(store: Arc<dyn Store>, request: RequestContext, delivery_point: String) -> Self {
    Self {
      store,
      request,
      delivery_point,
      cart: None,
      lines: Vec::new(),
      dropped_course_ids: Vec::new(),
      order: None,
      cart_cleared: false,
    }
  }
}

/// Per-order results of a course removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRemovalReport {
  pub course_id: Uuid,
  pub deleted_orders: Vec<Uuid>,
  pub repriced_orders: Vec<Uuid>,
  pub failed_orders: Vec<Uuid>,
}

#[derive(Clone)]
pub struct CourseRemovalCtxData {
  pub store: Arc<dyn Store>,
  pub request: RequestContext,
  pub course_id: Uuid,
  pub max_attempts: u32,
  pub removed_course: Option<Course>,
  pub affected_order_ids: Vec<Uuid>,
  pub report: CourseRemovalReport,
}

impl CourseRemovalCtxData {
  pub fn new(store: Arc<dyn Store>, request: RequestContext, course_id: Uuid, max_attempts: u32) -> Self {
    Self {
      store,
      request,
      course_id,
      max_attempts,
      removed_course: None,
      affected_order_ids: Vec::new(),
      report: CourseRemovalReport {
        course_id,
        ..Default::default()
      },
    }
  }
}
