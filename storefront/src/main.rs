// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use course_storefront::config::AppConfig;
use course_storefront::state::AppState;
use course_storefront::{seed, store, web};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting course storefront server...");

  let app_config = AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;

  let store = store::connect(&app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to open the store.");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
  })?;

  if let Err(e) = seed::prepare_store(store.as_ref(), &app_config).await {
    tracing::error!(error = ?e, "Failed to prepare the store.");
    return Err(std::io::Error::new(std::io::ErrorKind::Other, format!("{:#}", e)));
  }

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let app_state = AppState::new(store, app_config);
  tracing::info!("Storefront pipelines registered.");

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
