pub mod config;
pub mod schema;

pub use config::{
    Config, CredentialedProvider, FontsSection, IexSection, LogLevel, MainSection, MascotSection,
    OutputsSection, ProviderCredentials, Tracked,
};
pub use schema::{
    ConfigSection, FieldKind, FieldRule, FieldSpec, FieldValue, FieldValues, SectionSchema,
};
