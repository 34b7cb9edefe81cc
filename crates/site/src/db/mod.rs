//! Inquiry storage.
//!
//! # Table: `inquiries`
//!
//! | column       | type          | notes                          |
//! |--------------|---------------|--------------------------------|
//! | `id`         | `uuid`        | primary key, store-assigned    |
//! | `name`       | `text`        |                                |
//! | `phone`      | `text`        | as submitted                   |
//! | `inquiry`    | `text`        |                                |
//! | `is_read`    | `boolean`     | default `false`                |
//! | `created_at` | `timestamptz` | default `now()`, listing order |
//!
//! # Backends
//!
//! - [`RestInquiryStore`] - hosted REST API (URL + API key), the default
//! - [`PgInquiryStore`] - direct `PostgreSQL` via sqlx
//! - [`MemoryInquiryStore`] - in-process, for tests and local demos
//!
//! The snake_case row shape ([`InquiryRow`]) stays inside this module; the rest
//! of the site only sees [`donghang_core::Inquiry`].
//!
//! # Migrations
//!
//! The table definition lives in `crates/site/migrations/` and is applied via:
//! ```bash
//! cargo run -p donghang-cli -- migrate
//! ```

mod memory;
mod postgres;
mod rest;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use donghang_core::{Inquiry, InquiryId, NewInquiry};

use crate::config::StoreConfig;

pub use memory::MemoryInquiryStore;
pub use postgres::PgInquiryStore;
pub use rest::RestInquiryStore;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request to the store API failed.
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Store API returned a non-success status.
    #[error("store API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Store URL or credentials can't be used to build a client.
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// Store response did not have the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// One row of the `inquiries` table, in storage naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InquiryRow {
    pub id: InquiryId,
    pub name: String,
    pub phone: String,
    pub inquiry: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<InquiryRow> for Inquiry {
    fn from(row: InquiryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            inquiry: row.inquiry,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

/// Insert payload; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize)]
pub struct InsertInquiryRow<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub inquiry: &'a str,
    pub is_read: bool,
}

impl<'a> From<&'a NewInquiry> for InsertInquiryRow<'a> {
    fn from(new: &'a NewInquiry) -> Self {
        Self {
            name: new.name(),
            phone: new.phone().as_str(),
            inquiry: new.inquiry(),
            is_read: false,
        }
    }
}

/// Access contract for the external inquiry table.
///
/// Implementations perform each call at most once (no retries) and rely on the
/// backing store for row-level atomicity.
#[async_trait]
pub trait InquiryStore: Send + Sync {
    /// Insert a new unread row and return it with store-assigned fields.
    async fn insert(&self, new: &NewInquiry) -> Result<InquiryRow, StoreError>;

    /// All rows, newest `created_at` first.
    async fn list(&self) -> Result<Vec<InquiryRow>, StoreError>;

    /// Set `is_read = true`. Returns whether a row with `id` exists.
    async fn mark_read(&self, id: InquiryId) -> Result<bool, StoreError>;

    /// Remove the row. Returns whether a row with `id` existed.
    async fn delete(&self, id: InquiryId) -> Result<bool, StoreError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Build the store backend selected by configuration.
///
/// # Errors
///
/// Returns `StoreError` if the database pool or HTTP client can't be created.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn InquiryStore>, StoreError> {
    match config {
        StoreConfig::Rest { url, api_key } => {
            tracing::info!(url = %url, "Using REST inquiry store");
            Ok(Arc::new(RestInquiryStore::new(url, api_key)?))
        }
        StoreConfig::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            tracing::info!("Using PostgreSQL inquiry store");
            Ok(Arc::new(PgInquiryStore::new(pool)))
        }
    }
}
