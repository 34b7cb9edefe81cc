//! Notification errors.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
///
/// These never leave [`super::Notifier`]; they exist so delivery failures are
/// logged with a consistent shape.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Webhook answered with a non-success status.
    #[error("webhook returned {status}: {body}")]
    Rejected { status: u16, body: String },
}
