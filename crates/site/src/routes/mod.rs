//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                      - Landing page with the inquiry form
//! GET    /admin                 - Admin page (login form or inbox)
//!
//! # Public API
//! POST   /api/inquiry           - Submit an inquiry
//!
//! # Admin session
//! POST   /api/admin/auth        - Check password, set session cookie
//! GET    /api/admin/auth        - Report whether the caller is signed in
//! DELETE /api/admin/auth        - Clear session cookie
//!
//! # Admin inbox (requires session)
//! GET    /api/inquiries         - List inquiries, newest first
//! PATCH  /api/inquiries         - Mark an inquiry as read
//! DELETE /api/inquiries?id=     - Delete an inquiry
//! ```
//!
//! Health checks are mounted next to these in `lib.rs`.

pub mod admin_auth;
pub mod inquiries;
pub mod inquiry;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/inquiry", post(inquiry::submit))
        .route(
            "/inquiries",
            get(inquiries::list)
                .patch(inquiries::update)
                .delete(inquiries::delete),
        )
        .route(
            "/admin/auth",
            post(admin_auth::login)
                .get(admin_auth::status)
                .delete(admin_auth::logout),
        )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/admin", get(pages::admin))
        .nest("/api", api_routes())
}
