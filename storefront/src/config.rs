// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// One year.
pub const MAX_SESSION_TTL_HOURS: i64 = 8760;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Required when `store_backend` is `Postgres`.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub seed_db: bool,
  pub session_ttl_hours: i64,
  pub cascade_max_attempts: u32,
  pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AppConfig {
  /// In-memory settings, used by tests and local runs.
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      store_backend: StoreBackend::Memory,
      database_url: None,
      run_migrations: false,
      seed_db: false,
      session_ttl_hours: 24,
      cascade_max_attempts: 3,
      bootstrap_admin: None,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. Unset and blank variables
  /// fall back to their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var(&get, "SERVER_PORT", 8080u16)?;
    let store_backend = match get("STORE_BACKEND") {
      Some(raw) => raw.parse::<StoreBackend>()?,
      None => StoreBackend::Postgres,
    };
    let database_url = get("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required for the postgres store)".to_string(),
      ));
    }

    let run_migrations = parse_var(&get, "RUN_MIGRATIONS", true)?;
    let seed_db = parse_var(&get, "SEED_DB", false)?;
    let session_ttl_hours = parse_var(&get, "SESSION_TTL_HOURS", 24i64)?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
      return Err(AppError::Config(format!(
        "SESSION_TTL_HOURS must be between 1 and {}",
        MAX_SESSION_TTL_HOURS
      )));
    }
    let cascade_max_attempts = parse_var(&get, "CASCADE_MAX_ATTEMPTS", 3u32)?;
    if cascade_max_attempts == 0 {
      return Err(AppError::Config("CASCADE_MAX_ATTEMPTS must be at least 1".to_string()));
    }

    let bootstrap_admin = match (get("BOOTSTRAP_ADMIN_USERNAME"), get("BOOTSTRAP_ADMIN_PASSWORD")) {
      (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
      (None, None) => None,
      _ => {
        return Err(AppError::Config(
          "BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together".to_string(),
        ))
      }
    };

    tracing::info!(backend = ?store_backend, "Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      run_migrations,
      seed_db,
      session_ttl_hours,
      cascade_max_attempts,
      bootstrap_admin,
    })
  }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match get(name) {
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e))),
    None => Ok(default),
  }
}
