//! Inbox inspection command.
//!
//! # Environment Variables
//!
//! - `INQUIRY_STORE_URL` (or `SUPABASE_URL` / `DATABASE_URL`) - store location
//! - `INQUIRY_STORE_KEY` (or `SUPABASE_ANON_KEY`) - REST API key

use thiserror::Error;

use donghang_core::Inquiry;
use donghang_site::config::{ConfigError, StoreConfig};
use donghang_site::db::{self, StoreError};
use donghang_site::services::InquiryService;

/// Errors that can occur while listing inquiries.
#[derive(Debug, Error)]
pub enum InquiriesError {
    /// Store configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The store could not be reached or returned an error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Print inquiries, newest first.
///
/// # Errors
///
/// Returns `InquiriesError` if the store is not configured or unreachable.
pub async fn list(unread_only: bool) -> Result<(), InquiriesError> {
    dotenvy::dotenv().ok();

    let config = StoreConfig::from_env()?;
    tracing::info!(store = ?config, "Connecting to inquiry store...");
    let service = InquiryService::new(db::connect(&config).await?);

    let inquiries: Vec<Inquiry> = service
        .list()
        .await?
        .into_iter()
        .filter(|i| !unread_only || !i.is_read)
        .collect();

    #[allow(clippy::print_stdout)]
    {
        for inquiry in &inquiries {
            println!("{}", format_line(inquiry));
        }
        println!("{} inquiries", inquiries.len());
    }

    Ok(())
}

/// One inbox line: marker, timestamp, id, name, phone, first line of body.
fn format_line(inquiry: &Inquiry) -> String {
    let marker = if inquiry.is_read { ' ' } else { '*' };
    let preview = inquiry.inquiry.lines().next().unwrap_or_default();
    format!(
        "{marker} {} {} {} {} {}",
        inquiry.created_at.format("%Y-%m-%d %H:%M"),
        inquiry.id,
        inquiry.name,
        inquiry.phone,
        preview,
    )
}
