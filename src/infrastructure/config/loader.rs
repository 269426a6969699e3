use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use super::overlay::EnvOverlay;
use super::reader::{SourceDocument, SourceError, SourceReader};
use super::validator::Validator;
use crate::domain::models::config::{
    Config, CredentialedProvider, FontsSection, IexSection, MainSection, MascotSection,
    OutputsSection, ProviderCredentials,
};
use crate::domain::models::schema::ConfigSection;
use crate::domain::ValidationError;

/// Path resolved by [`ConfigLoader::load`].
pub const DEFAULT_CONFIG_PATH: &str = "config.ini";

/// Configuration error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration")]
    Validation(#[from] ValidationError),

    #[error("Malformed configuration source")]
    Source(#[from] SourceError),
}

impl ConfigError {
    /// The field-attributed violation, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Source(_) => None,
        }
    }
}

/// Resolves the INI file and environment into a validated [`Config`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve `config.ini` in the working directory without environment
    /// interpolation sources.
    pub fn load() -> Result<Config, ConfigError> {
        Self::resolve(DEFAULT_CONFIG_PATH, &[] as &[&str])
    }

    /// Resolve a configuration file
    ///
    /// Only the variables named in `env_allowlist` are visible to `%(NAME)s`
    /// references in the file. A missing file is treated as empty.
    pub fn resolve<S: AsRef<str>>(
        path: impl AsRef<Path>,
        env_allowlist: &[S],
    ) -> Result<Config, ConfigError> {
        let overlay = EnvOverlay::from_env(env_allowlist);
        let document = SourceReader::new(overlay).read(path.as_ref())?;
        let config = Self::resolve_document(&document)?;

        info!(
            path = %path.as_ref().display(),
            provider = %config.main.provider,
            "configuration resolved"
        );
        Ok(config)
    }

    /// Validate every section of an already parsed document.
    ///
    /// Sections are checked in the order Main, Outputs, Fonts, Mascot, then
    /// provider credentials; the first violation aborts resolution.
    pub fn resolve_document(document: &SourceDocument) -> Result<Config, ConfigError> {
        let main: MainSection = Self::section(document)?;

        let outputs = if document.has_section(OutputsSection::SCHEMA.name) {
            Self::section(document)?
        } else {
            debug!("no [Outputs] section, using built-in outputs");
            OutputsSection::default()
        };

        let fonts: FontsSection = Self::section(document)?;
        let mascot: MascotSection = Self::section(document)?;
        let credentials = Self::credentials(document, &main)?;

        Ok(Config {
            main,
            outputs,
            fonts,
            mascot,
            credentials,
        })
    }

    fn section<T: ConfigSection>(document: &SourceDocument) -> Result<T, ConfigError> {
        let name = T::SCHEMA.name;
        let raw = document.section(name)?;
        debug!(section = name, keys = raw.len(), "validating section");
        Ok(Validator::validate(&raw)?)
    }

    fn credentials(
        document: &SourceDocument,
        main: &MainSection,
    ) -> Result<ProviderCredentials, ConfigError> {
        match main.credentialed_provider() {
            Some(CredentialedProvider::Iex) => {
                let iex: IexSection = Self::section(document)?;
                Ok(ProviderCredentials::Iex(iex))
            }
            None => {
                debug!(provider = %main.provider, "provider needs no credentials");
                Ok(ProviderCredentials::Placeholder)
            }
        }
    }
}
