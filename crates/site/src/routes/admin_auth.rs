//! Admin session endpoints.
//!
//! `POST` checks the password and sets the session cookie, `GET` reports
//! whether the caller is signed in, and `DELETE` clears the cookie. Logging
//! out needs no session, so it also succeeds for anonymous callers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header::SET_COOKIE,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{AdminStatus, removal_cookie, session_cookie};
use crate::routes::inquiry::MALFORMED_BODY_MESSAGE;
use crate::state::AppState;

/// Login body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

/// Response for login and logout.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for the session check.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authenticated: bool,
}

/// Check the admin password and start a session.
///
/// POST /api/admin/auth
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(request) =
        payload.map_err(|_| AppError::BadRequest(MALFORMED_BODY_MESSAGE.to_string()))?;

    let password = request.password.unwrap_or_default();
    let token = state.admin().login(&password).map_err(|_| {
        tracing::warn!("Admin login failed");
        AppError::Unauthorized("비밀번호가 올바르지 않습니다.".to_string())
    })?;

    tracing::info!(expires_at = token.expires_at, "Admin signed in");
    let cookie = session_cookie(&token, state.admin());

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(SuccessResponse { success: true }),
    ))
}

/// Report whether the caller holds a valid session. No side effects.
///
/// GET /api/admin/auth
pub async fn status(AdminStatus(authenticated): AdminStatus) -> Json<StatusResponse> {
    Json(StatusResponse { authenticated })
}

/// End the session by expiring the cookie.
///
/// DELETE /api/admin/auth
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Admin session cleared");
    let cookie = removal_cookie(state.admin());

    (
        [(SET_COOKIE, cookie.to_string())],
        Json(SuccessResponse { success: true }),
    )
}
