//! Admin authentication extractors.
//!
//! Provides extractors for requiring an admin session in route handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::error::AppError;
use crate::middleware::session::session_token;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Message returned when an admin-only route is called without a session.
pub const UNAUTHORIZED_MESSAGE: &str = "인증이 필요합니다.";

/// Extractor that requires a valid admin session.
///
/// An absent, malformed, tampered or expired session token rejects the
/// request with `401` before the handler body runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "inbox"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match check_session(parts, state) {
            Ok(()) => Ok(Self),
            Err(reason) => {
                debug!(%reason, path = %parts.uri.path(), "Admin session rejected");
                Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))
            }
        }
    }
}

/// Extractor that reports whether the caller holds a valid admin session.
///
/// Unlike `RequireAdmin`, this never rejects the request.
#[derive(Debug, Clone, Copy)]
pub struct AdminStatus(pub bool);

impl FromRequestParts<AppState> for AdminStatus {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(check_session(parts, state).is_ok()))
    }
}

fn check_session(parts: &Parts, state: &AppState) -> Result<(), AuthError> {
    let token = session_token(&parts.headers).ok_or(AuthError::MissingSession)?;
    state.admin().verify(&token)
}
