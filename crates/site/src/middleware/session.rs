//! Admin session cookie.
//!
//! The cookie carries a signed token from [`AdminGate`]; there is no
//! server-side session store. Cookie building and parsing go through the
//! `cookie` crate re-exported by tower-sessions.

use axum::http::{HeaderMap, header};
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};

use crate::services::auth::{AdminGate, SESSION_TTL_SECONDS, SessionToken};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "dh_admin";

/// Build the `Set-Cookie` value that starts an admin session.
#[must_use]
pub fn session_cookie(token: &SessionToken, gate: &AdminGate) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.value.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(gate.secure_cookies())
        .path("/")
        .max_age(Duration::seconds(SESSION_TTL_SECONDS))
        .build()
}

/// Build the `Set-Cookie` value that ends an admin session.
#[must_use]
pub fn removal_cookie(gate: &AdminGate) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(gate.secure_cookies())
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Find the session token in the request's `Cookie` headers.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}
