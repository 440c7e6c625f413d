//! Credential verification
//!
//! Resolves a user record by email through an injected store, checks the
//! password, and derives the identity claims a session is minted from.
//! Sessions are only ever created from identities produced here.

use std::sync::Arc;

use eventum_db::{User, UserStore};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::password::verify_password;
use crate::session::Identity;

/// Verified-to-fail Argon2 hash used when no record matches the email, so
/// the unknown-email and wrong-password paths do comparable work.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZXZlbnR1bS1kdW1teS1zYWx0$QUJDREVGR0hJSktMTU5PUA";

/// Credential verifier over an injected user store
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    /// Create a new verifier backed by the given store
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Authenticate a credential pair, returning the full user record
    ///
    /// The HTTP boundary uses this to build the login response profile from
    /// the same single lookup that produced the claims.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // Both fields must be present before the store is touched
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        debug!("Login attempt for email: {}", email);

        let user_result = self.store.find_user_by_email(email).await?;

        let (hash_to_verify, user) = match user_result {
            Some(u) => (u.password_hash.clone(), Some(u)),
            None => (DUMMY_HASH.to_string(), None),
        };

        let password_valid = verify_password(password, &hash_to_verify)?;

        match (user, password_valid) {
            (Some(user), true) => {
                info!("User {} authenticated", user.email);
                Ok(user)
            }
            // Unknown email and wrong password collapse into one outcome
            _ => {
                debug!("Rejected login for email: {}", email);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Verify a credential pair and return the identity claims
    pub async fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        Ok(Identity::from_user(&self.authenticate(email, password).await?))
    }
}
