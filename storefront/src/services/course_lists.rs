// storefront/src/services/course_lists.rs

//! Cart and favorites: one service over either list kind.

use crate::errors::{AppError, Result};
use crate::models::{Course, CourseList, CourseSnapshot, ListKind};
use crate::store::Store;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Clone, Copy)]
pub struct CourseLists<'a> {
  store: &'a dyn Store,
  kind: ListKind,
}

impl<'a> CourseLists<'a> {
  pub fn new(store: &'a dyn Store, kind: ListKind) -> Self {
    Self { store, kind }
  }

  pub fn cart(store: &'a dyn Store) -> Self {
    Self::new(store, ListKind::Cart)
  }

  pub fn favorites(store: &'a dyn Store) -> Self {
    Self::new(store, ListKind::Favorites)
  }

  /// Never creates a list.
  pub async fn fetch_by_user(&self, user_id: Uuid) -> Result<Option<CourseList>> {
    self.store.find_list(self.kind, user_id).await
  }

  /// Appends a snapshot of `course`, creating the list on first use.
  /// Repeated adds of the same course append duplicates.
  #[instrument(name = "CourseLists::add", skip(self, course), fields(kind = %self.kind, course_id = %course.id))]
  pub async fn add(&self, user_id: Uuid, course: &Course) -> Result<CourseList> {
    let mut list = match self.store.find_list(self.kind, user_id).await? {
      Some(existing) => existing,
      None => {
        info!("Creating {} on first add.", self.kind);
        CourseList::new(user_id, self.kind)
      }
    };
    list.push(CourseSnapshot::from(course));
    self.store.save_list(&list).await?;
    Ok(list)
  }

  /// Removes the first entry for `course_id`.
  #[instrument(name = "CourseLists::remove", skip(self), fields(kind = %self.kind))]
  pub async fn remove(&self, user_id: Uuid, course_id: Uuid) -> Result<CourseList> {
    let mut list = self
      .store
      .find_list(self.kind, user_id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("No {} exists for this user.", self.kind)))?;

    if !list.remove_first(course_id) {
      warn!(%course_id, "Entry not present in {}.", self.kind);
      return Err(AppError::NotFound(format!("Course {} is not in the {}.", course_id, self.kind)));
    }
    self.store.save_list(&list).await?;
    Ok(list)
  }

  /// Drops the whole list. Returns whether one existed.
  pub async fn clear(&self, user_id: Uuid) -> Result<bool> {
    self.store.delete_list(self.kind, user_id).await
  }
}
