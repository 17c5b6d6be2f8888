//! Local Library catalog
//!
//! A server-rendered catalog of authors, books, book copies and genres, with
//! list, detail, create, update and delete pages for each record kind.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;
use views::Views;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub repository: Repository,
    pub views: Views,
}

impl AppState {
    pub fn new(repository: Repository) -> AppResult<Self> {
        Ok(Self {
            services: Arc::new(Services::new(repository.clone())),
            repository,
            views: Views::new()?,
        })
    }
}
