// storefront/src/services/catalog_service.rs

//! Course catalog reads and administrator edits. Deletion lives in the
//! course removal pipeline because it cascades into orders.

use crate::context::RequestContext;
use crate::errors::{AppError, Result};
use crate::models::{Comment, Course, CourseDraft, CourseEdit, MAX_PRICE_CENTS};
use crate::store::Store;
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

fn validate_course(course: &Course) -> Result<()> {
  if course.title.is_empty() {
    return Err(AppError::Validation("Course title is required.".to_string()));
  }
  if course.price_cents < 0 {
    return Err(AppError::Validation("Course price cannot be negative.".to_string()));
  }
  if course.price_cents > MAX_PRICE_CENTS {
    return Err(AppError::Validation(format!(
      "Course price cannot exceed {} cents.",
      MAX_PRICE_CENTS
    )));
  }
  Ok(())
}

pub async fn list(store: &dyn Store) -> Result<Vec<Course>> {
  store.list_courses().await
}

#[instrument(name = "catalog_service::search", skip(store))]
pub async fn search(store: &dyn Store, term: Option<&str>, category: Option<&str>) -> Result<Vec<Course>> {
  let term = term.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
    AppError::Validation("A search term is required.".to_string())
  })?;
  let category = category.map(str::trim).filter(|c| !c.is_empty());
  store.search_courses(term, category).await
}

pub async fn get(store: &dyn Store, course_id: Uuid) -> Result<Course> {
  store
    .find_course(course_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Course {} not found.", course_id)))
}

#[instrument(name = "catalog_service::create", skip(store, ctx, draft), fields(user_id = %ctx.user_id))]
pub async fn create(store: &dyn Store, ctx: &RequestContext, draft: CourseDraft) -> Result<Course> {
  ctx.require_admin("add courses")?;
  let course = Course::from_draft(draft);
  validate_course(&course)?;
  store.insert_course(&course).await?;
  info!(course_id = %course.id, title = %course.title, "Course created.");
  Ok(course)
}

#[instrument(name = "catalog_service::edit", skip(store, ctx, edit), fields(user_id = %ctx.user_id, course_id = %edit.id))]
pub async fn edit(store: &dyn Store, ctx: &RequestContext, edit: CourseEdit) -> Result<Course> {
  ctx.require_admin("edit courses")?;
  let mut course = get(store, edit.id).await?;
  course.apply_edit(edit);
  validate_course(&course)?;
  if !store.update_course(&course).await? {
    return Err(AppError::NotFound(format!("Course {} not found.", course.id)));
  }
  info!("Course updated.");
  Ok(course)
}

#[instrument(name = "catalog_service::add_comment", skip(store, ctx, text), fields(user_id = %ctx.user_id))]
pub async fn add_comment(store: &dyn Store, ctx: &RequestContext, course_id: Uuid, text: &str) -> Result<Comment> {
  let text = text.trim();
  if text.is_empty() {
    return Err(AppError::Validation("Comment text is required.".to_string()));
  }
  let comment = Comment {
    author: ctx.username.clone(),
    text: text.to_string(),
    date: Utc::now(),
  };
  if !store.push_comment(course_id, &comment).await? {
    return Err(AppError::NotFound(format!("Course {} not found.", course_id)));
  }
  Ok(comment)
}
