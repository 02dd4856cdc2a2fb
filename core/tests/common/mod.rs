// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use storeflow::{ContextData, FlowError, Handler, PipelineControl};
use tracing::Level;

/// Stand-in for a storefront request: a running total and a trail of steps.
#[derive(Clone, Debug, Default)]
pub struct BasketContext {
  pub total_cents: i64,
  pub steps_executed: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("storeflow error: {0}")]
  Flow(String),

  #[error("test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(err: FlowError) -> Self {
    TestError::Flow(format!("{:?}", err))
  }
}

/// Adds `amount_cents` to the total and records `step_name`; stops if the
/// context asks to stop at this step.
pub fn add_amount_handler(step_name: &'static str, amount_cents: i64) -> Handler<BasketContext, TestError> {
  Box::new(move |ctx: ContextData<BasketContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.total_cents += amount_cents;
      guard.steps_executed.push(step_name.to_string());
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn failing_handler(step_name: &'static str, message: &'static str) -> Handler<BasketContext, TestError> {
  Box::new(move |ctx: ContextData<BasketContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
