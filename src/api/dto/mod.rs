//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization. URI validation
//! happens in the [`Coder`](crate::application::services::Coder), not here.

pub mod history;
pub mod shorten;
pub mod stats;
