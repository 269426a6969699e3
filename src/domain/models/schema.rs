//! Declarative section schemas
//!
//! A [`SectionSchema`] is a static table of [`FieldSpec`]s. The validator walks
//! the table in declaration order, coercing each raw string into a
//! [`FieldValue`] and running the field's rules against the values accepted so
//! far. Rules that compare siblings therefore only see fields declared before
//! them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use url::Url;

/// Target type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Url,
}

/// A field value after type coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Url(Url),
}

impl FieldValue {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Url(_) => FieldKind::Url,
        }
    }

    /// Borrow the value as text, if it is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            Self::Text(text) => JsonValue::String(text.clone()),
            Self::Integer(number) => JsonValue::from(*number),
            Self::Float(number) => JsonValue::from(*number),
            Self::Url(url) => JsonValue::String(url.to_string()),
        }
    }
}

/// A rule applied to a coerced field value.
///
/// Receives the candidate value and the already-validated siblings of the
/// same section. Returns the accepted value or a human-readable reason.
pub type FieldRule = fn(FieldValue, &FieldValues) -> Result<FieldValue, String>;

/// Descriptor of a single field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Raw default, coerced like any source value. `None` makes the field required.
    pub default: Option<&'static str>,
    pub rules: &'static [FieldRule],
}

impl FieldSpec {
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Ordered field table for one named section.
#[derive(Debug, Clone, Copy)]
pub struct SectionSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl SectionSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Accumulator of validated values for one section, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    entries: Vec<(&'static str, FieldValue)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: FieldValue) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Text value of an already-validated sibling, if any.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// Render the accumulated values as a JSON object keyed by field name.
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .entries
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.to_json()))
            .collect();
        JsonValue::Object(map)
    }
}

/// A typed configuration section backed by a static schema.
///
/// The validator produces a [`FieldValues`] accumulator conforming to
/// [`ConfigSection::SCHEMA`] and deserializes it into the implementing type, so
/// the struct's serde field names must match the schema's field names.
pub trait ConfigSection: Serialize + DeserializeOwned {
    const SCHEMA: SectionSchema;
}
