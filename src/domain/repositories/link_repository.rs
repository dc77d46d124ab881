//! Storage contract for short links.

use crate::domain::entities::{DeletionRequest, HistoryEntry, StorageStats};
use crate::error::AppError;
use async_trait::async_trait;

/// Capability set every storage backend provides.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - process-local map
/// - [`crate::infrastructure::persistence::FileLinkRepository`] - map persisted as JSON
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL table
/// - [`crate::infrastructure::persistence::StorageBackend`] - runtime selection of the above
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns the original URI stored for `code`.
    ///
    /// Lookups are by code only; `owner_id` identifies the caller.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no row has this code
    /// - [`AppError::RowDeleted`] if the row exists but was soft-deleted
    /// - [`AppError::StorageUnavailable`] on backend failures
    async fn get(&self, code: &str, owner_id: i64) -> Result<String, AppError>;

    /// Generates a code for `uri`, stores the mapping and returns the code.
    ///
    /// A generated code that collides with an existing one is replaced by a
    /// fresh one a bounded number of times.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] carrying the existing code if `uri` is already stored
    /// - [`AppError::StorageUnavailable`] on backend failures; nothing is stored
    async fn set(&self, uri: &str, owner_id: i64) -> Result<String, AppError>;

    /// Lists all non-deleted links owned by `owner_id`, in no particular order.
    ///
    /// Returns an empty vector when the owner has no links.
    async fn get_by_user(&self, owner_id: i64) -> Result<Vec<HistoryEntry>, AppError>;

    /// Marks every row matching a `(code, owner_id)` pair in `requests` as deleted.
    ///
    /// Pairs that match nothing are ignored.
    async fn soft_delete(&self, requests: &[DeletionRequest]) -> Result<(), AppError>;

    /// Verifies the backend is reachable.
    async fn health_check(&self) -> Result<(), AppError>;

    /// Returns the number of stored links and of distinct owners.
    async fn stats(&self) -> Result<StorageStats, AppError>;
}
