//! New-inquiry chat notifications.
//!
//! This module provides:
//! - [`Notifier`] for posting an embed card to a chat webhook
//! - Embed payload types
//!
//! Delivery is best-effort. [`Notifier::spawn`] detaches the request from the
//! HTTP response, and every failure (missing configuration, network error,
//! non-2xx answer) is logged and dropped.

mod error;
mod types;

pub use error::NotificationError;
pub use types::{Embed, EmbedField, EmbedFooter, FIELD_VALUE_LIMIT, WebhookMessage};

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use donghang_core::NewInquiry;

/// Embed accent color (blue).
const EMBED_COLOR: u32 = 0x003b_82f6;

/// Upper bound on a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts new-inquiry notifications to a webhook, if one is configured.
#[derive(Clone)]
pub struct Notifier {
    client: Client,
    webhook_url: Option<SecretString>,
    footer: Option<String>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("enabled", &self.is_enabled())
            .field("webhook_url", &"[REDACTED]")
            .field("footer", &self.footer)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Create a notifier. `None` disables delivery.
    #[must_use]
    pub fn new(webhook_url: Option<SecretString>, footer: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
            footer,
        }
    }

    /// A notifier that never sends anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    /// Whether a destination is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Fire-and-forget delivery on a detached task.
    ///
    /// Returns `None` without spawning when notifications are disabled. The
    /// handle is only useful to tests; callers should drop it.
    pub fn spawn(&self, inquiry: &NewInquiry) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            debug!("Notification webhook not configured, skipping");
            return None;
        }

        let notifier = self.clone();
        let message = self.build_message(inquiry);
        Some(tokio::spawn(async move {
            notifier.deliver(&message).await;
        }))
    }

    /// Deliver a notification and wait for the outcome. Never fails.
    pub async fn notify(&self, inquiry: &NewInquiry) {
        if !self.is_enabled() {
            debug!("Notification webhook not configured, skipping");
            return;
        }
        self.deliver(&self.build_message(inquiry)).await;
    }

    /// Build the embed card for an inquiry.
    #[must_use]
    pub fn build_message(&self, inquiry: &NewInquiry) -> WebhookMessage {
        WebhookMessage {
            embeds: vec![Embed {
                title: "📋 새로운 상담 신청".to_string(),
                color: EMBED_COLOR,
                fields: vec![
                    EmbedField::new("👤 이름", inquiry.name(), true),
                    EmbedField::new("📞 연락처", inquiry.phone().as_str(), true),
                    EmbedField::new("💬 문의 내용", inquiry.inquiry(), false),
                ],
                footer: self.footer.clone().map(|text| EmbedFooter { text }),
                timestamp: Utc::now().to_rfc3339(),
            }],
        }
    }

    #[instrument(skip_all)]
    async fn deliver(&self, message: &WebhookMessage) {
        match self.send(message).await {
            Ok(()) => debug!("Inquiry notification delivered"),
            Err(NotificationError::Rejected { status, body }) => {
                warn!(status, body = %body, "Notification webhook rejected message");
            }
            Err(e) => warn!(error = %e, "Notification webhook request failed"),
        }
    }

    async fn send(&self, message: &WebhookMessage) -> Result<(), NotificationError> {
        let Some(url) = self.webhook_url.as_ref() else {
            return Ok(());
        };

        let response = self
            .client
            .post(url.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
