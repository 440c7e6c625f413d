//! Application state

use eventum_auth::{CredentialVerifier, SessionManager};
use eventum_db::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub verifier: Arc<CredentialVerifier>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(
        db: Database,
        verifier: Arc<CredentialVerifier>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            db,
            verifier,
            sessions,
        }
    }
}
