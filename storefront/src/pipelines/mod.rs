// storefront/src/pipelines/mod.rs

//! Every multi-step storefront operation, registered with one `Flows`
//! registry keyed by context type.

use crate::errors::AppError;
use storeflow::Flows;

pub mod contexts;

pub mod add_to_list_pipeline;
pub mod checkout_pipeline;
pub mod course_removal_pipeline;
pub mod register_pipeline;
pub mod signin_pipeline;

pub fn register_all_pipelines(flows: &Flows<AppError>) {
  tracing::info!("Registering storefront pipelines...");

  register_pipeline::register_registration_pipeline(flows);
  signin_pipeline::register_signin_pipeline(flows);
  add_to_list_pipeline::register_add_to_list_pipeline(flows);
  checkout_pipeline::register_checkout_pipeline(flows);
  course_removal_pipeline::register_course_removal_pipeline(flows);

  tracing::info!("All storefront pipelines registered.");
}
