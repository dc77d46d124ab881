//! Deletion request passed from request handlers to the deletion worker.

/// Request to soft-delete one code on behalf of its owner.
///
/// Created per code by [`Coder::delete_urls`](crate::application::services::Coder::delete_urls),
/// consumed by the deletion worker and discarded once its batch is flushed.
/// Requests whose `(code, owner_id)` pair matches no stored row are ignored by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRequest {
    pub owner_id: i64,
    pub code: String,
}

impl DeletionRequest {
    pub fn new(owner_id: i64, code: impl Into<String>) -> Self {
        Self {
            owner_id,
            code: code.into(),
        }
    }
}
