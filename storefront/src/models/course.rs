// storefront/src/models/course.rs

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Highest accepted course price (1 000 000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Adds up prices in cents, rejecting totals that do not fit in an `i64`.
pub fn sum_cents(prices: impl IntoIterator<Item = i64>) -> Result<i64> {
  prices
    .into_iter()
    .try_fold(0i64, |acc, price| acc.checked_add(price))
    .ok_or_else(|| AppError::Validation("Total price is out of range.".to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub author: String,
  pub text: String,
  pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
  pub id: Uuid,
  pub title: String,
  /// Minor currency units.
  pub price_cents: i64,
  pub img: String,
  pub description: String,
  pub category: String,
  #[sqlx(json)]
  pub comments: Vec<Comment>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Fields supplied when an administrator adds a course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
  pub title: String,
  pub price_cents: i64,
  #[serde(default)]
  pub img: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category: String,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEdit {
  pub id: Uuid,
  pub title: Option<String>,
  pub price_cents: Option<i64>,
  pub img: Option<String>,
  pub description: Option<String>,
  pub category: Option<String>,
}

impl Course {
  pub fn from_draft(draft: CourseDraft) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      title: draft.title.trim().to_string(),
      price_cents: draft.price_cents,
      img: draft.img,
      description: draft.description,
      category: draft.category.trim().to_string(),
      comments: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn apply_edit(&mut self, edit: CourseEdit) {
    if let Some(title) = edit.title {
      self.title = title.trim().to_string();
    }
    if let Some(price_cents) = edit.price_cents {
      self.price_cents = price_cents;
    }
    if let Some(img) = edit.img {
      self.img = img;
    }
    if let Some(description) = edit.description {
      self.description = description;
    }
    if let Some(category) = edit.category {
      self.category = category.trim().to_string();
    }
    self.updated_at = Utc::now();
  }

  /// Case-insensitive substring match on title or description.
  pub fn matches(&self, term: &str, category: Option<&str>) -> bool {
    let term = term.to_lowercase();
    let text_hit = self.title.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term);
    text_hit && category.map_or(true, |c| self.category == c)
  }
}
