//! Eventum Auth User Store
//!
//! This crate provides the user-record store for Eventum Auth,
//! using SQLite via sqlx for persistence.

pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use store::{Database, UserStore};

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
