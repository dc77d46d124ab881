//! Storage backend implementations.
//!
//! Concrete implementations of [`LinkRepository`](crate::domain::repositories::LinkRepository):
//!
//! - [`MemoryLinkRepository`] - Process-local map behind a read/write lock
//! - [`FileLinkRepository`] - Map persisted as a JSON file
//! - [`PgLinkRepository`] - PostgreSQL `urls` table
//! - [`StorageBackend`] - Runtime choice between the three

pub mod file_link_repository;
mod link_table;
pub mod memory_link_repository;
pub mod pg_link_repository;
pub mod storage_backend;

pub use file_link_repository::FileLinkRepository;
pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
pub use storage_backend::StorageBackend;
