//! API routes

mod auth;
mod health;
mod types;
mod users;

use axum::Router;

use crate::state::AppState;

#[allow(unused_imports)]
pub use auth::CurrentSession;
#[allow(unused_imports)]
pub use types::*;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .with_state(state)
}
