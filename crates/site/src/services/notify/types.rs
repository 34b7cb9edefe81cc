//! Webhook payload types (Discord embed subset).
//!
//! See: <https://discord.com/developers/docs/resources/message#embed-object>

use serde::Serialize;

/// Discord caps an embed field value at this many characters.
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Top-level webhook body.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    pub embeds: Vec<Embed>,
}

/// A rich embed card.
#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    /// RFC 3339 timestamp shown beside the footer.
    pub timestamp: String,
}

/// A name/value row inside an embed.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    /// Create a field, truncating the value to [`FIELD_VALUE_LIMIT`].
    #[must_use]
    pub fn new(name: impl Into<String>, value: &str, inline: bool) -> Self {
        let value = if value.chars().count() > FIELD_VALUE_LIMIT {
            let mut truncated: String = value.chars().take(FIELD_VALUE_LIMIT - 1).collect();
            truncated.push('…');
            truncated
        } else {
            value.to_owned()
        };

        Self {
            name: name.into(),
            value,
            inline,
        }
    }
}

/// Small text under the embed body.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}
