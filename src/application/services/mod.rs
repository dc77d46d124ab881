//! Business logic services for the application layer.

pub mod coder;

pub use coder::{Coder, CoderSettings};
