//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into [`Coder`](crate::application::services::Coder)
//! calls and formats responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Caller identification and tracing
//! - [`routes`] - Route configuration under `/api`

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
