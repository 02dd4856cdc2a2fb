// storefront/src/lib.rs

//! Online course storefront: catalog, cart, favorites, checkout into orders
//! and administrator tooling, served over actix-web.

pub mod config;
pub mod context;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use context::RequestContext;
pub use errors::{AppError, Result};
pub use state::AppState;
