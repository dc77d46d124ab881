//! Repository trait definitions for the domain layer.
//!
//! The storage contract is defined here and implemented by the backends in
//! `crate::infrastructure::persistence`. A mock implementation is generated
//! via `mockall` for unit tests.
//!
//! # Testing
//!
//! See `tests/repository_*.rs` for backend integration tests.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
