// storefront/src/models/order.rs

use super::course::{sum_cents, Course};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What the buyer paid for one course, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  pub course_id: Uuid,
  pub title: String,
  pub price_cents: i64,
}

impl From<&Course> for OrderLine {
  fn from(course: &Course) -> Self {
    Self {
      course_id: course.id,
      title: course.title.clone(),
      price_cents: course.price_cents,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  #[sqlx(json)]
  pub lines: Vec<OrderLine>,
  pub total_price_cents: i64,
  pub delivery_point: String,
  pub created_at: DateTime<Utc>,
}

impl Order {
  /// The total is the sum of the line prices; a total past `i64` is a
  /// validation error.
  pub fn new(user_id: Uuid, lines: Vec<OrderLine>, delivery_point: impl Into<String>) -> Result<Self> {
    let total_price_cents = sum_cents(lines.iter().map(|l| l.price_cents))?;
    Ok(Self {
      id: Uuid::new_v4(),
      user_id,
      lines,
      total_price_cents,
      delivery_point: delivery_point.into(),
      created_at: Utc::now(),
    })
  }

  pub fn contains_course(&self, course_id: Uuid) -> bool {
    self.lines.iter().any(|l| l.course_id == course_id)
  }

  /// Drops every line for `course_id`; returns how many were removed.
  pub fn remove_course(&mut self, course_id: Uuid) -> usize {
    let before = self.lines.len();
    self.lines.retain(|l| l.course_id != course_id);
    before - self.lines.len()
  }

  pub fn summary(&self) -> OrderSummary {
    OrderSummary {
      id: self.id,
      user_id: self.user_id,
      courses: self.lines.clone(),
      total_price_cents: self.total_price_cents,
      delivery_point: self.delivery_point.clone(),
      created_at: self.created_at,
      date: human_date(self.created_at),
    }
  }
}

/// An order as listed to its owner or an administrator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub id: Uuid,
  pub user_id: Uuid,
  pub courses: Vec<OrderLine>,
  pub total_price_cents: i64,
  pub delivery_point: String,
  pub created_at: DateTime<Utc>,
  /// `Www Mmm dd yyyy`, e.g. `Fri Oct 16 2026`.
  pub date: String,
}

pub fn human_date(at: DateTime<Utc>) -> String {
  at.format("%a %b %d %Y").to_string()
}
