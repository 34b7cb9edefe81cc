//! HTTP middleware and extractors for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Admin routes are guarded per handler by the [`RequireAdmin`] extractor
//! rather than a layer.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{AdminStatus, RequireAdmin};
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, removal_cookie, session_cookie, session_token};
