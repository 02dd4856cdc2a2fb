// storefront/src/models/course_list.rs

use super::course::sum_cents;
use super::snapshot::CourseSnapshot;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The two per-user course lists. They share one shape and never interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
  Cart,
  Favorites,
}

impl ListKind {
  pub fn table(self) -> &'static str {
    match self {
      ListKind::Cart => "carts",
      ListKind::Favorites => "favorites",
    }
  }
}

impl fmt::Display for ListKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ListKind::Cart => f.write_str("cart"),
      ListKind::Favorites => f.write_str("favorites"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseList {
  pub id: Uuid,
  pub user_id: Uuid,
  pub kind: ListKind,
  /// Insertion order; duplicates allowed.
  pub courses: Vec<CourseSnapshot>,
  pub updated_at: DateTime<Utc>,
}

impl CourseList {
  pub fn new(user_id: Uuid, kind: ListKind) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      kind,
      courses: Vec::new(),
      updated_at: Utc::now(),
    }
  }

  pub fn push(&mut self, snapshot: CourseSnapshot) {
    self.courses.push(snapshot);
    self.updated_at = Utc::now();
  }

  /// Removes the first entry for `course_id`. Returns false when none matched.
  pub fn remove_first(&mut self, course_id: Uuid) -> bool {
    match self.courses.iter().position(|s| s.course_id == course_id) {
      Some(index) => {
        self.courses.remove(index);
        self.updated_at = Utc::now();
        true
      }
      None => false,
    }
  }

  pub fn total_cents(&self) -> Result<i64> {
    sum_cents(self.courses.iter().map(|s| s.price_cents))
  }

  pub fn is_empty(&self) -> bool {
    self.courses.is_empty()
  }
}
