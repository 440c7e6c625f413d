//! Authentication error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Email or password absent from the request. Rejected before any
    /// store access.
    #[error("Email and password are required")]
    MissingCredentials,

    /// Unknown email and wrong password share this variant so both
    /// failures surface with the same message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid session signature")]
    SignatureInvalid,

    #[error("Session expired")]
    SessionExpired,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("User store error: {0}")]
    Store(#[from] eventum_db::DbError),

    #[error("Session encoding error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
}
