//! Session token management
//!
//! A session is an opaque, signed, time-bound JWT wrapping the identity
//! established at login. Tokens are minted here and read here; no other
//! component constructs or mutates one. There is no revocation: an issued
//! token stays valid until its expiry, even if the underlying record's
//! role changes in the interim.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{Duration, Utc};
use eventum_db::{Role, User};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Identity established by a successful credential verification
///
/// Identity carries a role *set*; user records hold a single role, which
/// becomes a singleton set here. Downstream authorization only ever
/// intersects sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub roles: BTreeSet<Role>,
}

impl Identity {
    /// Derive the identity claims from a verified user record
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            roles: BTreeSet::from([user.role.clone()]),
        }
    }

    /// Check whether any of the required roles is held
    pub fn has_any_role(&self, required: &BTreeSet<Role>) -> bool {
        !self.roles.is_disjoint(required)
    }
}

/// Session claims as embedded in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email the session was established with
    pub email: String,
    /// Role names held at issuance
    pub roles: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Session manager for token issuance and reading
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_hours: i64,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(secret: &str, session_ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl_hours,
        }
    }

    /// Session lifetime in seconds, as reported to clients at login
    pub fn ttl_seconds(&self) -> i64 {
        self.session_ttl_hours * 3600
    }

    /// Issue a signed session token for a verified identity
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.session_ttl_hours);

        let claims = SessionClaims {
            sub: identity.user_id.to_string(),
            email: identity.email.clone(),
            roles: identity.roles.iter().map(|r| r.as_str().to_string()).collect(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing session for user: {}", identity.email);

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Session)
    }

    /// Read a session token back into the identity it was issued for
    ///
    /// Expired tokens fail with `SessionExpired`; any other decode failure
    /// (bad signature, malformed token) fails with `SignatureInvalid`.
    pub fn read(&self, token: &str) -> Result<Identity, AuthError> {
        let validation = Validation::default();

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                    _ => AuthError::SignatureInvalid,
                }
            })?;

        // Check expiration
        let now = Utc::now().timestamp();
        if token_data.claims.exp < now {
            return Err(AuthError::SessionExpired);
        }

        let claims = token_data.claims;
        let user_id = claims.sub.parse().map_err(|_| AuthError::SignatureInvalid)?;

        // Role names that no longer parse are dropped rather than invented;
        // an empty surviving set authorizes nothing.
        let roles = claims
            .roles
            .iter()
            .filter_map(|r| Role::from_str(r).ok())
            .collect();

        Ok(Identity {
            user_id,
            email: claims.email,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: 7,
            email: "ana@example.com".to_string(),
            roles: BTreeSet::from([Role::Administrador]),
        }
    }

    #[test]
    fn test_issue_and_read_round_trip() {
        let manager = SessionManager::new("test-secret-key", 24);

        let token = manager.issue(&identity()).unwrap();
        let read_back = manager.read(&token).unwrap();

        assert_eq!(read_back, identity());
    }

    #[test]
    fn test_expired_session() {
        // Negative TTL mints a token whose expiry is already in the past,
        // well beyond the decoder's leeway.
        let manager = SessionManager::new("test-secret-key", -1);

        let token = manager.issue(&identity()).unwrap();
        let result = manager.read(&token);
        assert!(matches!(result, Err(AuthError::SessionExpired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let manager = SessionManager::new("test-secret-key", 24);

        let token = manager.issue(&identity()).unwrap();

        // Corrupt one character in the payload segment
        let mid = token.len() / 2;
        let flipped = if token.as_bytes()[mid] == b'x' { 'y' } else { 'x' };
        let mut tampered = token.clone();
        tampered.replace_range(mid..mid + 1, &flipped.to_string());
        assert_ne!(token, tampered);

        let result = manager.read(&tampered);
        assert!(matches!(result, Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = SessionManager::new("test-secret-key", 24);

        let result = manager.read("not-a-token");
        assert!(matches!(result, Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = SessionManager::new("secret-one", 24);
        let reader = SessionManager::new("secret-two", 24);

        let token = issuer.issue(&identity()).unwrap();
        let result = reader.read(&token);
        assert!(matches!(result, Err(AuthError::SignatureInvalid)));
    }
}
