//! Biblio, a library catalog and circulation server
//!
//! Exposes a REST JSON API over a Postgres catalog of books, authors,
//! genres, languages and physical copies, plus the loan operations
//! librarians use to renew and return copies. Caller identity arrives
//! from an upstream identity provider as trusted request headers; this
//! crate never handles credentials itself.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
