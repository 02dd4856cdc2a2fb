// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use storeflow::ContextData;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{run_pipeline, see_other};
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::models::{CourseDraft, CourseEdit};
use crate::pipelines::contexts::CourseRemovalCtxData;
use crate::services::catalog_service;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
  pub q: Option<String>,
  pub category: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CommentPayload {
  pub text: String,
}

pub async fn list_courses_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let courses = catalog_service::list(app_state.store.as_ref()).await?;
  Ok(HttpResponse::Ok().json(courses))
}

#[instrument(name = "handler::search_courses", skip(app_state))]
pub async fn search_courses_handler(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
  let courses =
    catalog_service::search(app_state.store.as_ref(), query.q.as_deref(), query.category.as_deref()).await?;
  Ok(HttpResponse::Ok().json(courses))
}

pub async fn get_course_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let course = catalog_service::get(app_state.store.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(course))
}

/// The course as an administrator edits it.
pub async fn edit_course_view_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.require_admin("edit courses")?;
  let course = catalog_service::get(app_state.store.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(course))
}

#[instrument(name = "handler::add_course", skip(app_state, req_payload, ctx), fields(user_id = %ctx.user_id))]
pub async fn add_course_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CourseDraft>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  catalog_service::create(app_state.store.as_ref(), &ctx, req_payload.into_inner()).await?;
  Ok(see_other("/products").finish())
}

#[instrument(name = "handler::edit_course", skip(app_state, req_payload, ctx), fields(user_id = %ctx.user_id))]
pub async fn edit_course_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CourseEdit>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  catalog_service::edit(app_state.store.as_ref(), &ctx, req_payload.into_inner()).await?;
  Ok(see_other("/products").finish())
}

#[instrument(name = "handler::delete_course", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_course_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let course_id = path.into_inner();
  let ctx_data = ContextData::new(CourseRemovalCtxData::new(
    app_state.store.clone(),
    ctx,
    course_id,
    app_state.config.cascade_max_attempts,
  ));

  if let Err(err) = run_pipeline(&app_state, ctx_data.clone()).await {
    let report = ctx_data.read().report.clone();
    if !report.failed_orders.is_empty() {
      warn!(failed_orders = ?report.failed_orders, "Course removal left orders unreconciled.");
    }
    return Err(err);
  }

  let report = ctx_data.read().report.clone();
  info!(
    %course_id,
    deleted_orders = report.deleted_orders.len(),
    repriced_orders = report.repriced_orders.len(),
    "Course removal finished."
  );
  Ok(see_other("/products").json(report))
}

#[instrument(name = "handler::add_comment", skip(app_state, req_payload, ctx), fields(user_id = %ctx.user_id))]
pub async fn add_comment_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<CommentPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let comment =
    catalog_service::add_comment(app_state.store.as_ref(), &ctx, path.into_inner(), &req_payload.text).await?;
  Ok(HttpResponse::Created().json(comment))
}
