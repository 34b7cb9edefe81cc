//! Inquiry service.
//!
//! Maps store rows to the application model and exposes the four inbox
//! operations. Store failures are logged here with full detail; callers only
//! decide how to present them.

use std::sync::Arc;

use tracing::instrument;

use donghang_core::{Inquiry, InquiryId, NewInquiry};

use crate::db::{InquiryStore, StoreError};

/// Create/list/mark-read/delete over the inquiry store.
#[derive(Clone)]
pub struct InquiryService {
    store: Arc<dyn InquiryStore>,
}

impl std::fmt::Debug for InquiryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InquiryService").finish_non_exhaustive()
    }
}

impl InquiryService {
    /// Create a new service over a store backend.
    #[must_use]
    pub fn new(store: Arc<dyn InquiryStore>) -> Self {
        Self { store }
    }

    /// Store a validated inquiry as unread.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the insert fails. A failed insert leaves no row
    /// behind.
    #[instrument(skip(self, new))]
    pub async fn create(&self, new: &NewInquiry) -> Result<Inquiry, StoreError> {
        let row = self.store.insert(new).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to save inquiry");
        })?;

        tracing::info!(inquiry_id = %row.id, "Inquiry saved");
        Ok(row.into())
    }

    /// All inquiries, newest first. Empty when there are none.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store is unreachable.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Inquiry>, StoreError> {
        let rows = self.store.list().await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to fetch inquiries");
        })?;

        Ok(rows.into_iter().map(Inquiry::from).collect())
    }

    /// Mark an inquiry as read.
    ///
    /// Idempotent: returns `true` whenever the inquiry exists, whether or not
    /// it was already read, and `false` when no inquiry has this id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the update fails.
    #[instrument(skip(self), fields(inquiry_id = %id))]
    pub async fn mark_as_read(&self, id: InquiryId) -> Result<bool, StoreError> {
        self.store.mark_read(id).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to mark inquiry as read");
        })
    }

    /// Permanently delete an inquiry.
    ///
    /// Returns `false` when no inquiry has this id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    #[instrument(skip(self), fields(inquiry_id = %id))]
    pub async fn delete(&self, id: InquiryId) -> Result<bool, StoreError> {
        let deleted = self.store.delete(id).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to delete inquiry");
        })?;

        if deleted {
            tracing::info!("Inquiry deleted");
        }
        Ok(deleted)
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store can't be reached.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryInquiryStore;

    fn service() -> InquiryService {
        InquiryService::new(Arc::new(MemoryInquiryStore::new()))
    }

    fn new_inquiry() -> NewInquiry {
        NewInquiry::validate(
            Some("홍길동"),
            Some("010-1234-5678"),
            Some("상담 요청합니다"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let service = service();
        let created = service.create(&new_inquiry()).await.unwrap();
        assert!(!created.is_read);

        let listed = service.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_list_empty_is_ok() {
        assert!(service().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_as_read_is_monotonic_and_idempotent() {
        let service = service();
        let created = service.create(&new_inquiry()).await.unwrap();

        assert!(service.mark_as_read(created.id).await.unwrap());
        assert!(service.mark_as_read(created.id).await.unwrap());

        let listed = service.list().await.unwrap();
        assert!(listed.iter().all(|i| i.is_read));
    }

    #[tokio::test]
    async fn test_mark_as_read_unknown_id_creates_nothing() {
        let service = service();
        assert!(!service.mark_as_read(InquiryId::random()).await.unwrap());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let service = service();
        let created = service.create(&new_inquiry()).await.unwrap();

        assert!(service.delete(created.id).await.unwrap());
        assert!(!service.delete(created.id).await.unwrap());
        assert!(service.list().await.unwrap().is_empty());
    }
}
