// storefront/src/seed.rs

//! Start-up data: demo courses for an empty catalog and the configured
//! bootstrap administrator.

use crate::config::AppConfig;
use crate::models::{Course, CourseDraft};
use crate::services::auth_service;
use crate::store::Store;
use anyhow::Context;
use tracing::info;

fn demo_courses() -> Vec<CourseDraft> {
  let draft = |title: &str, price_cents: i64, category: &str, description: &str| CourseDraft {
    title: title.to_string(),
    price_cents,
    img: format!("/img/{}.png", title.to_lowercase().replace(' ', "-")),
    description: description.to_string(),
    category: category.to_string(),
  };
  vec![
    draft("Rust Fundamentals", 4900, "programming", "Ownership, borrowing and lifetimes from scratch."),
    draft("Async Rust in Practice", 5900, "programming", "Futures, executors and actix-web services."),
    draft("PostgreSQL for Developers", 3900, "databases", "Schema design, indexes and JSONB."),
    draft("UI Sketching Basics", 1900, "design", "Wireframes and quick prototypes."),
  ]
}

/// Inserts the demo courses when the catalog is empty. Returns how many were
/// added.
pub async fn seed_catalog(store: &dyn Store) -> anyhow::Result<usize> {
  let existing = store.list_courses().await.context("listing courses before seeding")?;
  if !existing.is_empty() {
    info!(existing = existing.len(), "Catalog already populated; skipping seed.");
    return Ok(0);
  }

  let drafts = demo_courses();
  let count = drafts.len();
  for draft in drafts {
    let course = Course::from_draft(draft);
    store
      .insert_course(&course)
      .await
      .with_context(|| format!("seeding course '{}'", course.title))?;
  }
  info!(count, "Catalog seeded.");
  Ok(count)
}

/// Seeds the catalog (when enabled) and creates the bootstrap administrator
/// (when configured).
pub async fn prepare_store(store: &dyn Store, config: &AppConfig) -> anyhow::Result<()> {
  if config.seed_db {
    seed_catalog(store).await?;
  }
  if let Some(admin) = &config.bootstrap_admin {
    auth_service::ensure_admin(store, &admin.username, &admin.password)
      .await
      .context("creating the bootstrap administrator")?;
  }
  Ok(())
}
