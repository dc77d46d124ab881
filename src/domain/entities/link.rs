//! Short link entity and the read models derived from it.

use serde::{Deserialize, Serialize};

/// Owner id used for links created without a user identity.
pub const ANONYMOUS_OWNER: i64 = 0;

/// A stored mapping between a short code and the original URI.
///
/// Rows are never removed; deletion only flips `deleted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub original_uri: String,
    pub owner_id: i64,
    pub deleted: bool,
}

impl ShortLink {
    /// Creates a live (not deleted) link.
    pub fn new(code: String, original_uri: String, owner_id: i64) -> Self {
        Self {
            code,
            original_uri,
            owner_id,
            deleted: false,
        }
    }

    /// Returns true if the link belongs to `owner_id` and has not been deleted.
    pub fn is_visible_to(&self, owner_id: i64) -> bool {
        self.owner_id == owner_id && !self.deleted
    }
}

/// One entry of a user's shortening history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub code: String,
    pub original_uri: String,
}

impl From<&ShortLink> for HistoryEntry {
    fn from(link: &ShortLink) -> Self {
        Self {
            code: link.code.clone(),
            original_uri: link.original_uri.clone(),
        }
    }
}

/// Aggregate counters reported by a storage backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Number of stored links, deleted ones included.
    pub urls: u64,
    /// Number of distinct owners, the anonymous owner included.
    pub users: u64,
}
