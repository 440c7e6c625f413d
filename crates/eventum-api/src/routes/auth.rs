//! Authentication extractors and routes

use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    routing::post,
    Json, Router,
};
use eventum_auth::{AccessDecision, AccessPolicy, Identity, SessionState, LOGIN_REDIRECT};
use std::convert::Infallible;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, UserProfile};

// ==================== Session Resolution ====================

/// Extractor resolving the caller's session from the bearer token
///
/// Resolution never fails the request: a missing header, a bad signature,
/// or an expired token all resolve to `Unauthenticated` and leave the
/// decision to the guard.
pub struct CurrentSession(pub SessionState);

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let session = match token {
            None => SessionState::Unauthenticated,
            Some(token) => match app_state.sessions.read(token) {
                Ok(identity) => {
                    debug!("Resolved session for user: {}", identity.email);
                    SessionState::Authenticated(identity)
                }
                Err(e) => {
                    debug!("Rejected session token: {}", e);
                    SessionState::Unauthenticated
                }
            },
        };

        Ok(CurrentSession(session))
    }
}

/// Evaluate a policy against the resolved session, converting denials into
/// redirecting responses
pub(crate) fn enforce(
    policy: &AccessPolicy,
    session: &SessionState,
) -> Result<Identity, ApiError> {
    match policy.authorize(session) {
        AccessDecision::Allow => match session {
            SessionState::Authenticated(identity) => Ok(identity.clone()),
            // Allow is only produced for authenticated sessions
            _ => Err(ApiError::Unauthenticated {
                redirect: LOGIN_REDIRECT.to_string(),
            }),
        },
        AccessDecision::Deny { redirect } => {
            if matches!(session, SessionState::Unauthenticated) {
                Err(ApiError::Unauthenticated { redirect })
            } else {
                Err(ApiError::Forbidden { redirect })
            }
        }
        // Requests reach handlers with a fully resolved session; a pending
        // decision only exists for callers that resolve sessions lazily.
        AccessDecision::Pending => Err(ApiError::Unauthenticated {
            redirect: LOGIN_REDIRECT.to_string(),
        }),
    }
}

// ==================== Auth Routes ====================

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .verifier
        .authenticate(&request.email, &request.password)
        .await?;

    let identity = Identity::from_user(&user);
    let token = state.sessions.issue(&identity)?;

    Ok(Json(LoginResponse {
        token,
        expires_in: state.sessions.ttl_seconds(),
        user: UserProfile {
            id: user.id,
            email: user.email,
            role: user.role.as_str().to_string(),
            username: user.username,
            full_name: user.full_name,
        },
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/auth/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use eventum_auth::{hash_password, CredentialVerifier, SessionManager};
    use eventum_db::{Database, NewUser, Role, UserStore};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_app() -> (tempfile::TempDir, axum::Router, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();

        let store: Arc<dyn UserStore> = Arc::new(db.clone());
        let verifier = Arc::new(CredentialVerifier::new(store));
        let sessions = Arc::new(SessionManager::new("test-secret", 24));
        let state = AppState::new(db, verifier, sessions);

        (dir, create_router(state.clone()), state)
    }

    async fn seed_user(state: &AppState, email: &str, password: &str, role: Role) {
        state
            .db
            .insert_user(NewUser {
                username: email.split('@').next().unwrap().to_string(),
                email: email.to_string(),
                password_hash: hash_password(password).unwrap(),
                full_name: "Ana Torres".to_string(),
                role,
            })
            .await
            .unwrap();
    }

    fn login_request(email: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_session_with_stored_role() {
        let (_dir, app, state) = test_app().await;
        seed_user(&state, "a@x.com", "correct", Role::Administrador).await;

        let response = app.oneshot(login_request("a@x.com", "correct")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["user"]["role"], "administrador");
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["fullName"], "Ana Torres");

        // The returned token reads back to the same role
        let token = body["token"].as_str().unwrap();
        let identity = state.sessions.read(token).unwrap();
        assert_eq!(identity.roles, BTreeSet::from([Role::Administrador]));
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic_401_without_session() {
        let (_dir, app, state) = test_app().await;
        seed_user(&state, "a@x.com", "correct", Role::Administrador).await;

        let response = app.oneshot(login_request("a@x.com", "wrong")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_unknown_email_matches_wrong_password_response() {
        let (_dir, app, state) = test_app().await;
        seed_user(&state, "a@x.com", "correct", Role::Attendee).await;

        let miss = app
            .clone()
            .oneshot(login_request("nobody@x.com", "correct"))
            .await
            .unwrap();
        let mismatch = app.oneshot(login_request("a@x.com", "wrong")).await.unwrap();

        assert_eq!(miss.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(mismatch.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(miss).await, body_json(mismatch).await);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_before_lookup() {
        let (_dir, app, _state) = test_app().await;

        let response = app
            .clone()
            .oneshot(login_request("a@x.com", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // A body without the password field behaves the same way
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "email": "a@x.com" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
