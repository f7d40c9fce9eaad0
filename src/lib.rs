//! Library management server
//!
//! REST JSON API over admins, books and patrons, with password sign-in
//! issuing bearer tokens. Handlers in [`api`] call [`services`], which call
//! the typed stores in [`repository`].

use std::sync::Arc;

pub mod api;
pub mod assembler;
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

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
