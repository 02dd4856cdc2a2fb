// core/src/lib.rs

//! storeflow: small asynchronous step pipelines for the course storefront.
//!
//! A storefront operation that touches the store more than once (checkout,
//! course removal, sign-in, ...) is written as a [`Pipeline`] of named steps.
//! Each step can carry `before`, `on` and `after` handlers; a handler either
//! lets the pipeline continue or stops it early. Pipelines are registered in a
//! [`Flows`] registry keyed by the type of data they operate on, so a caller
//! only needs the context data to run the right pipeline.
//!
//! [`WorkQueue`] complements pipelines for fan-out work where each item must be
//! attempted independently and its outcome reported (with bounded retries).

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod work_queue;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Flows;

pub use crate::work_queue::{ItemOutcome, QueueReport, RetryPolicy, WorkQueue};
