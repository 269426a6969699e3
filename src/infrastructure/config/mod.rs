//! Configuration management infrastructure
//!
//! Layered resolution of the INI settings file:
//! - INI parsing with lazy `%(name)s` interpolation
//! - Allowlisted environment variables as interpolation sources
//! - Schema-driven validation of each section
//! - Provider-dependent credential selection

pub mod loader;
pub mod overlay;
pub mod reader;
pub mod validator;

pub use loader::{ConfigError, ConfigLoader, DEFAULT_CONFIG_PATH};
pub use overlay::EnvOverlay;
pub use reader::{RawSection, SourceDocument, SourceError, SourceReader};
pub use validator::Validator;
