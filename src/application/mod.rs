//! Application layer services implementing business logic.
//!
//! This layer validates input and coordinates storage calls and the deletion
//! queue. Services consume the repository trait and provide a clean API for
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::coder::Coder`] - URI shortening, resolution, history and batched deletion

pub mod services;
