use tracing::trace;
use url::Url;

use super::reader::RawSection;
use crate::domain::error::{INVALID_NUMERIC_VALUE, INVALID_URL};
use crate::domain::models::schema::{
    ConfigSection, FieldKind, FieldSpec, FieldValue, FieldValues, SectionSchema,
};
use crate::domain::ValidationError;

/// Applies section schemas to raw string maps
///
/// Validation is fail-fast: fields are processed in declaration order and the
/// first violation is returned. Raw keys the schema does not declare are
/// ignored.
pub struct Validator;

impl Validator {
    /// Validate a raw section into its typed form.
    pub fn validate<T: ConfigSection>(raw: &RawSection) -> Result<T, ValidationError> {
        let schema = T::SCHEMA;
        let values = Self::validate_fields(&schema, raw)?;
        serde_json::from_value(values.to_json())
            .map_err(|err| ValidationError::new(schema.name, "*", err.to_string()))
    }

    /// Validate a raw section against a schema, returning the accepted values.
    pub fn validate_fields(
        schema: &SectionSchema,
        raw: &RawSection,
    ) -> Result<FieldValues, ValidationError> {
        let mut accepted = FieldValues::new();

        for spec in schema.fields {
            let candidate = match (raw.get(spec.name), spec.default) {
                (Some(value), _) => value.as_str(),
                (None, Some(default)) => default,
                (None, None) => return Err(ValidationError::missing(schema.name, spec.name)),
            };

            let mut value = coerce(schema.name, spec, candidate)?;
            for rule in spec.rules {
                value = rule(value, &accepted)
                    .map_err(|reason| ValidationError::new(schema.name, spec.name, reason))?;
            }

            trace!(section = schema.name, field = spec.name, "field accepted");
            accepted.push(spec.name, value);
        }

        Ok(accepted)
    }
}

fn coerce(section: &str, spec: &FieldSpec, raw: &str) -> Result<FieldValue, ValidationError> {
    let invalid = |reason: &str| ValidationError::new(section, spec.name, reason);
    let trimmed = raw.trim();

    match spec.kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Integer => trimmed
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| invalid(INVALID_NUMERIC_VALUE)),
        FieldKind::Float => match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(FieldValue::Float(number)),
            _ => Err(invalid(INVALID_NUMERIC_VALUE)),
        },
        FieldKind::Url => match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(FieldValue::Url(url))
            }
            _ => Err(invalid(INVALID_URL)),
        },
    }
}
