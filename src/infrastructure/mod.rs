//! Infrastructure layer module
//!
//! This module contains the adapters around the domain model:
//! - Configuration resolution (INI reader, environment overlay, validator)
//! - Logging infrastructure

pub mod config;
pub mod logging;
