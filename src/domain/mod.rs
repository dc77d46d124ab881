//! Domain layer containing business entities and the storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - The storage capability contract
//! - [`deletion_worker`] - Asynchronous batched soft-delete worker
//!
//! # Deletion Flow
//!
//! 1. A caller asks [`crate::application::services::Coder`] to delete codes
//! 2. One [`entities::DeletionRequest`] per code is sent to a bounded channel
//! 3. [`deletion_worker::run_deletion_worker`] accumulates requests
//! 4. Every flush interval the batch is persisted via [`repositories::LinkRepository::soft_delete`]

pub mod deletion_worker;
pub mod entities;
pub mod repositories;
