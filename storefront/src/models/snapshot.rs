// storefront/src/models/snapshot.rs

use super::course::Course;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A copy of a course taken when it was added to a list. It does not follow
/// later changes to the course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSnapshot {
  pub course_id: Uuid,
  pub title: String,
  pub price_cents: i64,
  pub img: String,
}

impl From<&Course> for CourseSnapshot {
  fn from(course: &Course) -> Self {
    Self {
      course_id: course.id,
      title: course.title.clone(),
      price_cents: course.price_cents,
      img: course.img.clone(),
    }
  }
}
