//! Domain layer for the inkystock configuration engine
//!
//! This module contains the typed configuration sections, their declarative
//! schemas and the validation error they report.

pub mod error;
pub mod models;

// Re-export error types for convenient access
pub use error::ValidationError;
