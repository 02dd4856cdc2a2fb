// storefront/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::store::Store;
use std::sync::Arc;
use storeflow::Flows;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub flows: Arc<Flows<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the pipeline registry and wires every storefront pipeline into it.
  pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
    let flows = Arc::new(Flows::<AppError>::new());
    pipelines::register_all_pipelines(&flows);
    Self {
      store,
      flows,
      config: Arc::new(config),
    }
  }
}
