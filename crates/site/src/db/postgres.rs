//! Direct `PostgreSQL` backend.
//!
//! Queries are built at runtime (`query_as`) so the crate builds without a
//! live database or an offline query cache.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use donghang_core::{InquiryId, NewInquiry};

use super::{InquiryRow, InquiryStore, StoreError};

/// Inquiry store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgInquiryStore {
    pool: PgPool,
}

impl PgInquiryStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InquiryStore for PgInquiryStore {
    #[instrument(skip(self, new))]
    async fn insert(&self, new: &NewInquiry) -> Result<InquiryRow, StoreError> {
        let row = sqlx::query_as::<_, InquiryRow>(
            r"
            INSERT INTO inquiries (name, phone, inquiry, is_read)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, name, phone, inquiry, is_read, created_at
            ",
        )
        .bind(new.name())
        .bind(new.phone().as_str())
        .bind(new.inquiry())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<InquiryRow>, StoreError> {
        let rows = sqlx::query_as::<_, InquiryRow>(
            r"
            SELECT id, name, phone, inquiry, is_read, created_at
            FROM inquiries
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[instrument(skip(self), fields(inquiry_id = %id))]
    async fn mark_read(&self, id: InquiryId) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE inquiries SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(inquiry_id = %id))]
    async fn delete(&self, id: InquiryId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
