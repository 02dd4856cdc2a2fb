// storefront/src/pipelines/course_removal_pipeline.rs

//! Deleting a course and repairing every order that referenced it.
//!
//! Orders are reconciled one by one through a `WorkQueue`; each is retried up
//! to the configured number of attempts and its outcome recorded. Nothing is
//! rolled back across orders: if some order cannot be repaired the caller
//! gets an internal error after every order has been attempted.

use crate::errors::AppError;
use crate::pipelines::contexts::CourseRemovalCtxData;
use crate::services::order_service::{self, Reconciliation};
use std::sync::Arc;
use storeflow::{ContextData, Flows, ItemOutcome, Pipeline, PipelineControl, RetryPolicy, WorkQueue};
use tracing::{error, info, warn};

pub fn register_course_removal_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<CourseRemovalCtxData, AppError>::new(&[
    ("authorize_course_removal", false, None),
    ("delete_course_record", false, None),
    ("collect_affected_orders", false, None),
    (
      "reconcile_affected_orders",
      false,
      Some(Arc::new(|ctx: ContextData<CourseRemovalCtxData>| {
        ctx.read().affected_order_ids.is_empty()
      })),
    ),
  ]);

  p.on_root("authorize_course_removal", |ctx_data: ContextData<CourseRemovalCtxData>| {
    Box::pin(async move {
      let request = { ctx_data.read().request.clone() };
      request.require_admin("delete courses")?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("delete_course_record", |ctx_data: ContextData<CourseRemovalCtxData>| {
    Box::pin(async move {
      let (store, course_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.course_id)
      };

      let not_found = || AppError::NotFound(format!("Course {} not found.", course_id));
      let course = store.find_course(course_id).await?.ok_or_else(not_found)?;
      if !store.delete_course(course_id).await? {
        return Err(not_found());
      }
      info!(%course_id, title = %course.title, "Course deleted.");
      ctx_data.write().removed_course = Some(course);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("collect_affected_orders", |ctx_data: ContextData<CourseRemovalCtxData>| {
    Box::pin(async move {
      let (store, course_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.course_id)
      };

      let order_ids = store.order_ids_with_course(course_id).await?;
      info!(%course_id, affected = order_ids.len(), "Orders referencing the removed course.");
      ctx_data.write().affected_order_ids = order_ids;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("reconcile_affected_orders", |ctx_data: ContextData<CourseRemovalCtxData>| {
    Box::pin(async move {
      let (store, course_id, order_ids, max_attempts) = {
        let guard = ctx_data.read();
        (
          guard.store.clone(),
          guard.course_id,
          guard.affected_order_ids.clone(),
          guard.max_attempts,
        )
      };

      let report = WorkQueue::new(order_ids, RetryPolicy::attempts(max_attempts))
        .drain(|order_id| {
          let store = store.clone();
          async move { order_service::reconcile_after_course_removal(store.as_ref(), order_id, course_id).await }
        })
        .await;

      let failed_count = {
        let mut guard = ctx_data.write();
        for (order_id, outcome) in &report.outcomes {
          match outcome {
            ItemOutcome::Done {
              value: Reconciliation::Deleted,
              ..
            } => guard.report.deleted_orders.push(*order_id),
            ItemOutcome::Done {
              value: Reconciliation::Repriced { .. },
              ..
            } => guard.report.repriced_orders.push(*order_id),
            ItemOutcome::Done {
              value: Reconciliation::Unaffected,
              ..
            } => {}
            ItemOutcome::Failed { .. } => guard.report.failed_orders.push(*order_id),
          }
        }
        guard.report.failed_orders.len()
      };

      if failed_count > 0 {
        for (order_id, last_error) in report.failed() {
          warn!(%order_id, %last_error, "Order left unreconciled.");
        }
        error!(%course_id, failed_count, "Course removed but some orders could not be reconciled.");
        return Err(AppError::Internal(format!(
          "{} order(s) could not be reconciled after removing course {}.",
          failed_count, course_id
        )));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  tracing::info!("Course removal pipeline registered.");
}
