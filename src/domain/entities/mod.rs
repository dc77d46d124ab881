//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without storage concerns.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A code to URI mapping with its owner and deletion flag
//! - [`HistoryEntry`] - A user's view of one of their links
//! - [`StorageStats`] - Aggregate counters reported by a backend
//! - [`DeletionRequest`] - A queued soft-delete for one code

pub mod deletion;
pub mod link;

pub use deletion::DeletionRequest;
pub use link::{ANONYMOUS_OWNER, HistoryEntry, ShortLink, StorageStats};
