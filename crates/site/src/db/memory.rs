//! In-process backend for tests and local demos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use donghang_core::{InquiryId, NewInquiry};

use super::{InquiryRow, InquiryStore, StoreError};

/// Inquiry store that keeps rows in memory.
///
/// Cloning shares the same rows. Each insert gets a `created_at` strictly
/// later than the previous one, so ordering is deterministic even when two
/// inserts land within the same clock tick.
#[derive(Debug, Clone, Default)]
pub struct MemoryInquiryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<InquiryId, InquiryRow>,
    last_created: Option<chrono::DateTime<Utc>>,
}

impl MemoryInquiryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }
}

#[async_trait]
impl InquiryStore for MemoryInquiryStore {
    async fn insert(&self, new: &NewInquiry) -> Result<InquiryRow, StoreError> {
        let mut inner = self.inner.write().await;

        let now = Utc::now();
        let created_at = match inner.last_created {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        };
        inner.last_created = Some(created_at);

        let row = InquiryRow {
            id: InquiryId::random(),
            name: new.name().to_owned(),
            phone: new.phone().as_str().to_owned(),
            inquiry: new.inquiry().to_owned(),
            is_read: false,
            created_at,
        };
        inner.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn list(&self) -> Result<Vec<InquiryRow>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<InquiryRow> = inner.rows.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_read(&self, id: InquiryId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id) {
            Some(row) => {
                row.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: InquiryId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_inquiry(name: &str) -> NewInquiry {
        NewInquiry::validate(Some(name), Some("010-1234-5678"), Some("상담 요청합니다")).unwrap()
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryInquiryStore::new();
        store.insert(&new_inquiry("첫번째")).await.unwrap();
        store.insert(&new_inquiry("두번째")).await.unwrap();
        store.insert(&new_inquiry("세번째")).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["세번째", "두번째", "첫번째"]);
    }

    #[tokio::test]
    async fn test_mark_read_and_delete_report_existence() {
        let store = MemoryInquiryStore::new();
        let row = store.insert(&new_inquiry("홍길동")).await.unwrap();
        assert!(!row.is_read);

        assert!(store.mark_read(row.id).await.unwrap());
        assert!(store.mark_read(row.id).await.unwrap());
        assert!(!store.mark_read(InquiryId::random()).await.unwrap());

        assert!(store.delete(row.id).await.unwrap());
        assert!(!store.delete(row.id).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_rows() {
        let store = MemoryInquiryStore::new();
        let other = store.clone();
        store.insert(&new_inquiry("홍길동")).await.unwrap();
        assert_eq!(other.len().await, 1);
    }
}
