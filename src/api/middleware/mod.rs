//! HTTP middleware and request extractors.
//!
//! Provides caller identification and observability middleware.

pub mod tracing;
pub mod user;

pub use user::UserId;
