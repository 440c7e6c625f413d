//! User administration routes
//!
//! All routes are gated by the authorization guard: the caller needs at
//! least one of the administration roles.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use eventum_auth::{hash_password, AccessPolicy};
use eventum_db::{NewUser, Role, User};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::{enforce, CurrentSession};
use super::types::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Roles allowed to administer user records
fn admin_policy() -> AccessPolicy {
    AccessPolicy::require([Role::Sysadmin, Role::Administrador])
}

// ==================== Input Validation ====================

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate username format and length
fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    // Only allow alphanumeric characters, underscores, and hyphens
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, and hyphens"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate email shape and length
fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email cannot be empty".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(ApiError::BadRequest("Email is not valid".to_string()));
    }
    Ok(())
}

/// Validate password length
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        role: user.role.as_str().to_string(),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }
}

// ==================== User Routes ====================

/// GET /api/v1/users
async fn list_users(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    enforce(&admin_policy(), &session)?;

    let users = state.db.list_users().await?;

    Ok(Json(users.into_iter().map(user_response).collect()))
}

/// POST /api/v1/users
async fn create_user(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    enforce(&admin_policy(), &session)?;

    validate_username(&request.username)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    debug!("Creating user: {}", request.email);

    let role = Role::from_str(&request.role)
        .map_err(|_| ApiError::BadRequest(format!("Invalid role: {}", request.role)))?;

    let password_hash = hash_password(&request.password)?;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash,
            full_name: request.full_name.clone(),
            role,
        })
        .await?;

    info!("Created user: {}", user.email);

    Ok((StatusCode::CREATED, Json(user_response(user))))
}

/// GET /api/v1/users/:id
async fn get_user(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    enforce(&admin_policy(), &session)?;

    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    Ok(Json(user_response(user)))
}

/// PUT /api/v1/users/:id
async fn update_user(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    enforce(&admin_policy(), &session)?;

    debug!("Updating user: {}", id);

    // Verify user exists
    let _user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    // Update role if provided
    if let Some(role_str) = &request.role {
        let role = Role::from_str(role_str)
            .map_err(|_| ApiError::BadRequest(format!("Invalid role: {}", role_str)))?;
        state.db.update_user_role(id, role).await?;
    }

    // Update password if provided
    if let Some(password) = &request.password {
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        state.db.update_user_password(id, &password_hash).await?;
    }

    // Fetch updated user
    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    info!("Updated user: {}", user.email);

    Ok(Json(user_response(user)))
}

/// DELETE /api/v1/users/:id
async fn delete_user(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    enforce(&admin_policy(), &session)?;

    debug!("Deleting user: {}", id);

    let deleted = state.db.delete_user(id).await?;

    if deleted {
        info!("Deleted user: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("User: {}", id)))
    }
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/{id}", get(get_user))
        .route("/api/v1/users/{id}", put(update_user))
        .route("/api/v1/users/{id}", delete(delete_user))
}
