// storefront/src/pipelines/add_to_list_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::AddToListCtxData;
use crate::services::CourseLists;
use storeflow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{info, warn};

/// Cart and favorites share this pipeline; the list kind travels in the
/// context.
pub fn register_add_to_list_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<AddToListCtxData, AppError>::new(&[
    ("fetch_course_for_list", false, None),
    ("append_snapshot_to_list", false, None),
  ]);

  p.on_root("fetch_course_for_list", |ctx_data: ContextData<AddToListCtxData>| {
    Box::pin(async move {
      let (store, course_id, kind) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.course_id, guard.kind)
      };

      match store.find_course(course_id).await? {
        Some(course) => {
          ctx_data.write().course = Some(course);
          Ok::<_, AppError>(PipelineControl::Continue)
        }
        None => {
          warn!(%course_id, %kind, "Cannot add unknown course.");
          Err(AppError::NotFound(format!("Course {} not found.", course_id)))
        }
      }
    })
  });

  p.on_root("append_snapshot_to_list", |ctx_data: ContextData<AddToListCtxData>| {
    Box::pin(async move {
      let (store, kind, user_id, course) = {
        let guard = ctx_data.read();
        let course = guard
          .course
          .clone()
          .ok_or_else(|| AppError::Internal("Course missing before list append.".to_string()))?;
        (guard.store.clone(), guard.kind, guard.user_id, course)
      };

      let list = CourseLists::new(store.as_ref(), kind).add(user_id, &course).await?;
      info!(%user_id, %kind, entries = list.courses.len(), "Course added to list.");
      ctx_data.write().updated_list = Some(list);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  tracing::info!("Add-to-list pipeline registered.");
}
