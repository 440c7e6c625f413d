//! Role-based authorization guard
//!
//! A pure decision function: given the resolved session state and a
//! required-role set, produce allow/deny plus the redirect target on deny.
//! The boundary layer performs the actual redirect, which keeps the guard
//! testable and safe to evaluate on every access check.

use std::collections::BTreeSet;

use eventum_db::Role;

use crate::session::Identity;

/// Where unauthenticated callers are sent
pub const LOGIN_REDIRECT: &str = "/login";
/// Where authenticated callers lacking the required roles are sent
pub const UNAUTHORIZED_REDIRECT: &str = "/unauthorized";

/// Resolution state of the caller's session
///
/// `Unresolved` is distinct from `Unauthenticated`: a session that has not
/// finished loading must not be treated as a denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unresolved,
    Unauthenticated,
    Authenticated(Identity),
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session still unresolved; take no action until it settles
    Pending,
    Allow,
    Deny { redirect: String },
}

/// A required-role set paired with its login redirect
///
/// A single required role and a list where any one must match are both
/// expressed by the same set intersection.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    required: BTreeSet<Role>,
    login_redirect: String,
}

impl AccessPolicy {
    /// Build a policy requiring at least one of the given roles
    pub fn require(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required: roles.into_iter().collect(),
            login_redirect: LOGIN_REDIRECT.to_string(),
        }
    }

    /// Override the login redirect target
    pub fn with_login_redirect(mut self, path: impl Into<String>) -> Self {
        self.login_redirect = path.into();
        self
    }

    /// Decide access for the given session state
    pub fn authorize(&self, session: &SessionState) -> AccessDecision {
        match session {
            SessionState::Unresolved => AccessDecision::Pending,
            SessionState::Unauthenticated => AccessDecision::Deny {
                redirect: self.login_redirect.clone(),
            },
            SessionState::Authenticated(identity) => {
                if identity.has_any_role(&self.required) {
                    AccessDecision::Allow
                } else {
                    AccessDecision::Deny {
                        redirect: UNAUTHORIZED_REDIRECT.to_string(),
                    }
                }
            }
        }
    }
}
