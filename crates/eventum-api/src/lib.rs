//! Eventum Auth REST API
//!
//! This crate provides the Axum-based HTTP boundary for Eventum Auth:
//! the login endpoint, role-gated user administration, and health checks.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
