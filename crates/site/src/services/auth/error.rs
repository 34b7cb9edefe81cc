//! Authentication error types.

use thiserror::Error;

/// Errors that can occur in the admin session gate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Submitted password does not match the admin secret.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No session token was presented.
    #[error("no session")]
    MissingSession,

    /// Token is malformed or its signature does not verify.
    #[error("invalid session token")]
    InvalidSession,

    /// Token verified but its expiry has passed.
    #[error("session expired")]
    SessionExpired,
}
