//! inkystock - configuration engine for a ticker/quote e-ink display
//!
//! Resolves an INI settings file into a fully validated [`Config`], or the
//! first field-attributed violation.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): typed sections, their declarative schemas and rules
//! - **Infrastructure Layer** (`infrastructure`): INI reader, environment overlay,
//!   validator, resolver, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use inkystock::ConfigLoader;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::resolve("config.ini", &["IEX_TOKEN"])?;
//!     println!("tracking {:?} via {}", config.main.tracked(), config.main.provider);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, CredentialedProvider, FontsSection, IexSection, LogLevel, MainSection, MascotSection,
    OutputsSection, ProviderCredentials, Tracked,
};
pub use domain::ValidationError;
pub use infrastructure::config::{ConfigError, ConfigLoader, EnvOverlay, SourceError, SourceReader};
