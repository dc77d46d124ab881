//! In-memory implementation of the link repository.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::link_table::LinkTable;
use crate::domain::entities::{DeletionRequest, HistoryEntry, StorageStats};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Process-local link storage.
///
/// All data is lost when the process exits. The URI check and the insert run
/// under one write lock, so concurrent submissions of the same URI resolve to
/// a single code.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    table: RwLock<LinkTable>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn get(&self, code: &str, _owner_id: i64) -> Result<String, AppError> {
        self.table.read().get(code)
    }

    async fn set(&self, uri: &str, owner_id: i64) -> Result<String, AppError> {
        self.table.write().insert(uri, owner_id)
    }

    async fn get_by_user(&self, owner_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
        Ok(self.table.read().by_owner(owner_id))
    }

    async fn soft_delete(&self, requests: &[DeletionRequest]) -> Result<(), AppError> {
        let changed = self.table.write().soft_delete(requests);
        tracing::debug!(
            requested = requests.len(),
            deleted = changed.len(),
            "soft delete applied"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn stats(&self) -> Result<StorageStats, AppError> {
        Ok(self.table.read().stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_set_then_get() {
        let repo = MemoryLinkRepository::new();

        let code = repo.set("https://site.com", 0).await.unwrap();

        assert!(!code.is_empty());
        assert_eq!(repo.get(&code, 0).await.unwrap(), "https://site.com");
    }

    #[tokio::test]
    async fn test_get_missing_code() {
        let repo = MemoryLinkRepository::new();

        let result = repo.get("not-exists", 0).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_soft_deleted_row_reports_row_deleted() {
        let repo = MemoryLinkRepository::new();
        let code = repo.set("https://site.com", 4).await.unwrap();

        repo.soft_delete(&[DeletionRequest::new(4, code.clone())])
            .await
            .unwrap();

        assert!(matches!(
            repo.get(&code, 4).await,
            Err(AppError::RowDeleted { .. })
        ));
    }

    #[tokio::test]
    async fn test_health_check_is_trivially_ok() {
        assert!(MemoryLinkRepository::new().health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_same_uri_yields_single_code() {
        let repo = Arc::new(MemoryLinkRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.set("https://same.example", 1).await })
            })
            .collect();

        let mut codes = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(code) => codes.push(code),
                Err(AppError::Conflict { code }) => codes.push(code),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        codes.dedup();
        assert_eq!(codes.len(), 1);
        assert_eq!(repo.stats().await.unwrap().urls, 1);
    }
}
