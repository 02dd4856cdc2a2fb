// storefront/src/web/handlers/mod.rs

use crate::errors::AppError;
use crate::state::AppState;
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, HttpResponseBuilder};
use storeflow::{ContextData, PipelineResult};
use tracing::warn;

pub mod auth_handlers;
pub mod cart_handlers;
pub mod favorites_handlers;
pub mod order_handlers;
pub mod product_handlers;

pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// `303 See Other` pointing at `location`.
pub(crate) fn see_other(location: &str) -> HttpResponseBuilder {
  let mut builder = HttpResponse::SeeOther();
  builder.insert_header((LOCATION, location));
  builder
}

/// Runs the pipeline registered for `TData`. None of the storefront
/// pipelines stop early, so a stopped run is reported as an internal error.
pub(crate) async fn run_pipeline<TData>(app_state: &AppState, ctx_data: ContextData<TData>) -> Result<(), AppError>
where
  TData: Send + Sync + 'static,
{
  match app_state.flows.run(ctx_data).await? {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => {
      warn!(pipeline = std::any::type_name::<TData>(), "Pipeline was stopped by a handler.");
      Err(AppError::Internal("The operation was halted.".to_string()))
    }
  }
}
