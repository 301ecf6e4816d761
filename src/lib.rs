//! Librarium Library Management System
//!
//! REST JSON API for a small library: librarian accounts, the book catalog,
//! the student roster, lending and returns, and membership fees.

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
    pub services: Arc<services::Services>,
}
