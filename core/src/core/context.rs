// core/src/core/context.rs

//! The boxed handler type every pipeline step phase stores.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A pipeline step handler.
///
/// Receives a clone of the shared `ContextData<TData>` and resolves to a
/// [`PipelineControl`] or the pipeline's error type.
///
/// Lock guards taken on the context must be dropped before the handler awaits
/// anything; the locks are blocking `parking_lot` locks.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
