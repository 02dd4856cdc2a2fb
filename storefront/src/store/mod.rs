// storefront/src/store/mod.rs

//! Persistence behind one trait, with a PostgreSQL and an in-process backend.

use crate::config::{AppConfig, StoreBackend};
use crate::errors::{AppError, Result};
use crate::models::{Comment, Course, CourseList, ListKind, Order, Session, User};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Document-style access to every collection. Each method touches a single
/// row/document; nothing here spans several documents atomically.
#[async_trait]
pub trait Store: Send + Sync {
  /// Fails with `Validation` when the username is taken.
  async fn insert_user(&self, user: &User) -> Result<()>;
  async fn find_user(&self, user_id: Uuid) -> Result<Option<User>>;
  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

  async fn insert_session(&self, session: &Session) -> Result<()>;
  async fn find_session(&self, token: &str) -> Result<Option<Session>>;
  async fn delete_session(&self, token: &str) -> Result<bool>;

  /// Ordered by title.
  async fn list_courses(&self) -> Result<Vec<Course>>;
  /// Case-insensitive substring search on title and description, ordered by title.
  async fn search_courses(&self, term: &str, category: Option<&str>) -> Result<Vec<Course>>;
  async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>>;
  /// Courses that still exist among `course_ids`, in no particular order.
  async fn find_courses(&self, course_ids: &[Uuid]) -> Result<Vec<Course>>;
  async fn insert_course(&self, course: &Course) -> Result<()>;
  async fn update_course(&self, course: &Course) -> Result<bool>;
  async fn push_comment(&self, course_id: Uuid, comment: &Comment) -> Result<bool>;
  async fn delete_course(&self, course_id: Uuid) -> Result<bool>;

  async fn find_list(&self, kind: ListKind, user_id: Uuid) -> Result<Option<CourseList>>;
  /// Insert or replace the user's list of this kind.
  async fn save_list(&self, list: &CourseList) -> Result<()>;
  async fn delete_list(&self, kind: ListKind, user_id: Uuid) -> Result<bool>;

  async fn insert_order(&self, order: &Order) -> Result<()>;
  async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>>;
  /// Oldest first; all users when `user_id` is `None`.
  async fn list_orders(&self, user_id: Option<Uuid>) -> Result<Vec<Order>>;
  async fn order_ids_with_course(&self, course_id: Uuid) -> Result<Vec<Uuid>>;
  async fn update_order(&self, order: &Order) -> Result<bool>;
  async fn delete_order(&self, order_id: Uuid) -> Result<bool>;
}

/// Opens the backend selected by the configuration, applying migrations for
/// PostgreSQL when asked to.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn Store>> {
  match config.store_backend {
    StoreBackend::Memory => {
      tracing::info!("Using the in-memory store.");
      Ok(Arc::new(MemoryStore::new()))
    }
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
      let store = PgStore::connect(url).await?;
      tracing::info!("Successfully connected to the database.");
      if config.run_migrations {
        store.migrate().await?;
      }
      Ok(Arc::new(store))
    }
  }
}
