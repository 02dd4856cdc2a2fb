// storefront/src/web/handlers/favorites_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storeflow::ContextData;
use tracing::instrument;
use uuid::Uuid;

use super::{run_pipeline, see_other};
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::models::ListKind;
use crate::pipelines::contexts::AddToListCtxData;
use crate::services::CourseLists;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePayload {
  pub course_id: Uuid,
}

#[instrument(name = "handler::view_favorites", skip(app_state, ctx), fields(user_id = %ctx.user_id))]
pub async fn view_favorites_handler(
  app_state: web::Data<AppState>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let courses = CourseLists::favorites(app_state.store.as_ref())
    .fetch_by_user(ctx.user_id)
    .await?
    .map(|list| list.courses)
    .unwrap_or_default();
  Ok(HttpResponse::Ok().json(json!({ "courses": courses })))
}

#[instrument(
  name = "handler::add_favorite",
  skip(app_state, req_payload, ctx),
  fields(user_id = %ctx.user_id, course_id = %req_payload.course_id)
)]
pub async fn add_favorite_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<FavoritePayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(AddToListCtxData::new(
    app_state.store.clone(),
    ListKind::Favorites,
    ctx.user_id,
    req_payload.course_id,
  ));
  run_pipeline(&app_state, ctx_data).await?;
  Ok(see_other("/favorites").finish())
}

#[instrument(
  name = "handler::remove_favorite",
  skip(app_state, req_payload, ctx),
  fields(user_id = %ctx.user_id, course_id = %req_payload.course_id)
)]
pub async fn remove_favorite_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<FavoritePayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  CourseLists::favorites(app_state.store.as_ref())
    .remove(ctx.user_id, req_payload.course_id)
    .await?;
  Ok(see_other("/favorites").finish())
}
