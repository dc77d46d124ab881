//! Helpers shared by the core and the storage backends.
//!
//! - [`code_generator`] - Random short code generation
//! - [`uri`] - Absolute URI validation
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod uri;
