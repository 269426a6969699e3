use thiserror::Error;

/// Reason reported when a field without a default is absent.
pub const MISSING_REQUIRED_FIELD: &str = "missing required field";

/// Reason reported when an integer or float field does not parse.
pub const INVALID_NUMERIC_VALUE: &str = "invalid numeric value";

/// Reason reported when a URL field is not an absolute http(s) URL.
pub const INVALID_URL: &str = "invalid URL";

/// A single schema violation, attributed to the section and field that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{section}] {field}: {reason}")]
pub struct ValidationError {
    /// Section the field belongs to, e.g. `Main`
    pub section: String,

    /// Offending field name
    pub field: String,

    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        section: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// A required field was absent from the source.
    pub fn missing(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(section, field, MISSING_REQUIRED_FIELD)
    }

    /// True when the error is about an absent required field.
    pub fn is_missing_field(&self) -> bool {
        self.reason == MISSING_REQUIRED_FIELD
    }
}
