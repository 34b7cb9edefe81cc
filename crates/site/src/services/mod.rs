//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Admin password check and session tokens
//! - `inquiries` - Create, list, mark-read and delete over the inquiry store
//! - `notify` - Best-effort chat notifications for new inquiries

pub mod auth;
pub mod inquiries;
pub mod notify;

pub use auth::{AdminGate, AuthError, SessionToken};
pub use inquiries::InquiryService;
pub use notify::Notifier;
