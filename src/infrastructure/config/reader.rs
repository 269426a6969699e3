//! INI source reader
//!
//! Parses `[Section]` / `key = value` text into raw, uninterpolated tables.
//! Interpolation of `%(name)s` references happens when a section is asked
//! for, so a broken reference only fails resolution if its section is read.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::overlay::EnvOverlay;

/// Raw key/value strings of one section, keys lower-cased.
pub type RawSection = BTreeMap<String, String>;

/// Name of the section whose keys every other section falls back to.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Maximum nesting of `%(name)s` references.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Errors raised while reading or interpolating the source file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Line {line}: key/value pair before any [section] header")]
    MissingSectionHeader { line: usize },

    #[error("Line {line}: expected `key = value`, found {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("Line {line}: section [{section}] already defined")]
    DuplicateSection { line: usize, section: String },

    #[error("Line {line}: key {key:?} already defined in [{section}]")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },

    #[error("[{section}] {key}: reference %({reference})s does not resolve")]
    UnresolvedReference {
        section: String,
        key: String,
        reference: String,
    },

    #[error("[{section}] {key}: '%' must be followed by '%' or '(name)s', found {fragment:?}")]
    BadInterpolationSyntax {
        section: String,
        key: String,
        fragment: String,
    },

    #[error("[{section}] {key}: interpolation nested more than 10 levels deep")]
    InterpolationTooDeep { section: String, key: String },
}

/// Reads INI files, carrying the environment overlay used for interpolation
#[derive(Debug, Clone, Default)]
pub struct SourceReader {
    overlay: EnvOverlay,
}

impl SourceReader {
    pub fn new(overlay: EnvOverlay) -> Self {
        Self { overlay }
    }

    /// Read and parse a file. A missing file yields an empty document.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<SourceDocument, SourceError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "reading configuration file");
                self.parse(&text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "configuration file not found, using empty source");
                Ok(SourceDocument::empty(self.overlay.clone()))
            }
            Err(err) => Err(SourceError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Parse INI text.
    pub fn parse(&self, text: &str) -> Result<SourceDocument, SourceError> {
        let mut document = SourceDocument::empty(self.overlay.clone());
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;
        // Indentation of the last key or header line
        let mut indent_level = 0;
        // Blank lines seen inside the current value
        let mut blank_run = 0;

        for (index, line) in text.lines().enumerate() {
            let number = index + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if last_key.is_some() {
                    blank_run += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indent = line.chars().take_while(|c| c.is_whitespace()).count();
            if indent > indent_level {
                if let (Some(section), Some(key)) = (&current, &last_key) {
                    if let Some(value) = document.table_mut(section).get_mut(key) {
                        for _ in 0..=blank_run {
                            value.push('\n');
                        }
                        value.push_str(trimmed);
                        blank_run = 0;
                        continue;
                    }
                }
            }
            indent_level = indent;
            blank_run = 0;

            if let Some(header) = trimmed
                .strip_prefix('[')
                .and_then(|h| h.rfind(']').map(|end| &h[..end]))
            {
                let name = header.trim();
                if name.is_empty() {
                    return Err(SourceError::MalformedLine {
                        line: number,
                        content: trimmed.to_string(),
                    });
                }
                if name != DEFAULT_SECTION && document.sections.contains_key(name) {
                    return Err(SourceError::DuplicateSection {
                        line: number,
                        section: name.to_string(),
                    });
                }
                if name != DEFAULT_SECTION {
                    document.sections.insert(name.to_string(), RawSection::new());
                }
                current = Some(name.to_string());
                last_key = None;
                continue;
            }

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(SourceError::MalformedLine {
                    line: number,
                    content: trimmed.to_string(),
                });
            };
            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(SourceError::MalformedLine {
                    line: number,
                    content: trimmed.to_string(),
                });
            }

            let Some(section) = &current else {
                return Err(SourceError::MissingSectionHeader { line: number });
            };
            let table = document.table_mut(section);
            if table.contains_key(&key) {
                return Err(SourceError::DuplicateKey {
                    line: number,
                    section: section.clone(),
                    key,
                });
            }
            table.insert(key.clone(), value);
            last_key = Some(key);
        }

        Ok(document)
    }
}

/// Parsed, uninterpolated INI content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    defaults: RawSection,
    sections: BTreeMap<String, RawSection>,
    overlay: EnvOverlay,
}

impl SourceDocument {
    fn empty(overlay: EnvOverlay) -> Self {
        Self {
            defaults: RawSection::new(),
            sections: BTreeMap::new(),
            overlay,
        }
    }

    fn table_mut(&mut self, section: &str) -> &mut RawSection {
        if section == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        self.sections.entry(section.to_string()).or_default()
    }

    /// True if the file declares `[name]`. `[DEFAULT]` is never a section.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Interpolated key/value map of a section, `[DEFAULT]` keys included.
    ///
    /// An absent section yields an empty map.
    pub fn section(&self, name: &str) -> Result<RawSection, SourceError> {
        let Some(own) = self.sections.get(name) else {
            return Ok(RawSection::new());
        };

        let mut merged = self.defaults.clone();
        merged.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));

        merged
            .iter()
            .map(|(key, value)| {
                let resolved = Interpolation {
                    section: name,
                    key,
                    table: &merged,
                    overlay: &self.overlay,
                }
                .expand(value, 1)?;
                Ok((key.clone(), resolved))
            })
            .collect()
    }
}

struct Interpolation<'a> {
    section: &'a str,
    key: &'a str,
    table: &'a RawSection,
    overlay: &'a EnvOverlay,
}

impl Interpolation<'_> {
    fn expand(&self, value: &str, depth: usize) -> Result<String, SourceError> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(SourceError::InterpolationTooDeep {
                section: self.section.to_string(),
                key: self.key.to_string(),
            });
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];

            if rest.starts_with("%%") {
                out.push('%');
                rest = &rest[2..];
                continue;
            }

            let reference = rest
                .strip_prefix("%(")
                .and_then(|tail| tail.find(')').map(|end| &tail[..end]))
                .filter(|name| !name.is_empty());
            let Some(reference) = reference else {
                return Err(self.bad_syntax(rest));
            };
            // "%(" + name + ")"
            let consumed = reference.len() + 3;
            if !rest[consumed..].starts_with('s') {
                return Err(self.bad_syntax(rest));
            }
            rest = &rest[consumed + 1..];

            let name = reference.to_lowercase();
            if let Some(raw) = self.table.get(&name) {
                if raw.contains('%') {
                    out.push_str(&self.expand(raw, depth + 1)?);
                } else {
                    out.push_str(raw);
                }
            } else if let Some(env) = self.overlay.get(&name) {
                out.push_str(env);
            } else {
                return Err(SourceError::UnresolvedReference {
                    section: self.section.to_string(),
                    key: self.key.to_string(),
                    reference: reference.to_string(),
                });
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    fn bad_syntax(&self, fragment: &str) -> SourceError {
        SourceError::BadInterpolationSyntax {
            section: self.section.to_string(),
            key: self.key.to_string(),
            fragment: fragment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SourceDocument {
        SourceReader::default().parse(text).expect("text should parse")
    }

    #[test]
    fn test_sections_keys_and_comments() {
        let doc = parse(
            "# display settings\n\
             [Main]\n\
             Currency = USD\n\
             ; comment\n\
             provider: IEX\n\
             stock =\n",
        );

        let main = doc.section("Main").unwrap();
        assert_eq!(main.get("currency").map(String::as_str), Some("USD"));
        assert_eq!(main.get("provider").map(String::as_str), Some("IEX"));
        assert_eq!(main.get("stock").map(String::as_str), Some(""));
        assert!(doc.has_section("Main"));
        assert!(!doc.has_section("main"));
    }

    #[test]
    fn test_value_keeps_later_delimiters() {
        let doc = parse("[Main]\ndatabase = sqlite:////tmp/inkystock.db\n");
        let main = doc.section("Main").unwrap();
        assert_eq!(main["database"], "sqlite:////tmp/inkystock.db");
    }

    #[test]
    fn test_absent_section_is_empty() {
        let doc = parse("[Main]\nprovider = IEX\n");
        assert!(doc.section("Outputs").unwrap().is_empty());
        assert!(!doc.has_section("Outputs"));
    }

    #[test]
    fn test_continuation_lines() {
        let doc = parse("[Main]\nnotes = first\n  second\n\tthird\n\nprovider = Mock\n");
        let main = doc.section("Main").unwrap();
        assert_eq!(main["notes"], "first\nsecond\nthird");
        assert_eq!(main["provider"], "Mock");
    }

    #[test]
    fn test_uniformly_indented_keys_are_separate() {
        let doc = parse("[Main]\n  provider = Mock\n  currency = USD\n");
        let main = doc.section("Main").unwrap();
        assert_eq!(main["provider"], "Mock");
        assert_eq!(main["currency"], "USD");
    }

    #[test]
    fn test_continuation_needs_deeper_indent_than_key() {
        let doc = parse("[Main]\n  notes = first\n    second\n  provider = Mock\n");
        let main = doc.section("Main").unwrap();
        assert_eq!(main["notes"], "first\nsecond");
        assert_eq!(main["provider"], "Mock");
    }

    #[test]
    fn test_blank_line_inside_indented_value() {
        let doc = parse("[Main]\nnotes = first\n  second\n\n  orphan = x\n\n\n[Fonts]\n");
        let main = doc.section("Main").unwrap();
        assert_eq!(main["notes"], "first\nsecond\n\norphan = x");
        assert!(!main.contains_key("orphan"));
    }

    #[test]
    fn test_comment_does_not_end_value() {
        let doc = parse("[Main]\nnotes = first\n# aside\n  second\n");
        assert_eq!(doc.section("Main").unwrap()["notes"], "first\nsecond");
    }

    #[test]
    fn test_header_with_trailing_text() {
        let doc = parse("[Main] ; display settings\nprovider = Mock\n[Fonts]# sizes\n");
        assert_eq!(doc.section("Main").unwrap()["provider"], "Mock");
        assert!(doc.has_section("Fonts"));
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["Fonts", "Main"]);
    }

    #[test]
    fn test_default_section_fallback() {
        let doc = parse("[DEFAULT]\ncurrency = GBP\nloglevel = DEBUG\n[Main]\nloglevel = INFO\n");
        let main = doc.section("Main").unwrap();
        assert_eq!(main["currency"], "GBP");
        assert_eq!(main["loglevel"], "INFO");
        assert!(!doc.has_section("DEFAULT"));
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["Main"]);
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let reader = SourceReader::default();

        assert_eq!(
            reader.parse("provider = IEX\n"),
            Err(SourceError::MissingSectionHeader { line: 1 })
        );
        assert!(matches!(
            reader.parse("[Main]\njust words\n"),
            Err(SourceError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            reader.parse("[Main]\n[Fonts]\n[Main]\n"),
            Err(SourceError::DuplicateSection { line: 3, .. })
        ));
        assert!(matches!(
            reader.parse("[Main]\nstock = A\nSTOCK = B\n"),
            Err(SourceError::DuplicateKey { line: 3, .. })
        ));
        assert!(matches!(
            reader.parse("[]\n"),
            Err(SourceError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_interpolation_within_section_and_defaults() {
        let doc = parse(
            "[DEFAULT]\nroot = ./resources\n\
             [Fonts]\nfonts = %(root)s/fonts\nticker = %(fonts)s/04B_03__.TTF\nchart = 100%%\n",
        );
        let fonts = doc.section("Fonts").unwrap();
        assert_eq!(fonts["ticker"], "./resources/fonts/04B_03__.TTF");
        assert_eq!(fonts["chart"], "100%");
    }

    #[test]
    fn test_interpolation_reference_is_case_insensitive() {
        let doc = parse("[Main]\nbase = x\nvalue = %(BASE)s\n");
        assert_eq!(doc.section("Main").unwrap()["value"], "x");
    }

    #[test]
    fn test_overlay_interpolation() {
        let overlay = EnvOverlay::from_pairs([("IEX_TOKEN", "pk_live")]);
        let doc = SourceReader::new(overlay)
            .parse("[IEX]\ntoken = %(IEX_TOKEN)s\n")
            .unwrap();
        let iex = doc.section("IEX").unwrap();
        assert_eq!(iex["token"], "pk_live");
        assert!(!iex.contains_key("iex_token"));
    }

    #[test]
    fn test_file_keys_shadow_overlay() {
        let overlay = EnvOverlay::from_pairs([("TOKEN_SOURCE", "env")]);
        let doc = SourceReader::new(overlay)
            .parse("[IEX]\ntoken_source = file\ntoken = %(TOKEN_SOURCE)s\n")
            .unwrap();
        assert_eq!(doc.section("IEX").unwrap()["token"], "file");
    }

    #[test]
    fn test_overlay_values_are_literal() {
        let overlay = EnvOverlay::from_pairs([("RAW", "50%(x)s")]);
        let doc = SourceReader::new(overlay)
            .parse("[Main]\nvalue = %(RAW)s\n")
            .unwrap();
        assert_eq!(doc.section("Main").unwrap()["value"], "50%(x)s");
    }

    #[test]
    fn test_interpolation_errors() {
        let doc = parse("[Main]\nvalue = %(nowhere)s\n");
        assert_eq!(
            doc.section("Main"),
            Err(SourceError::UnresolvedReference {
                section: "Main".into(),
                key: "value".into(),
                reference: "nowhere".into(),
            })
        );

        for bad in ["50%", "%(name)", "%()s", "%x"] {
            let doc = parse(&format!("[Main]\nname = n\nvalue = {bad}\n"));
            assert!(
                matches!(
                    doc.section("Main"),
                    Err(SourceError::BadInterpolationSyntax { .. })
                ),
                "{bad} should be a syntax error"
            );
        }
    }

    #[test]
    fn test_self_reference_hits_depth_limit() {
        let doc = parse("[Main]\nloop = %(loop)s\n");
        assert!(matches!(
            doc.section("Main"),
            Err(SourceError::InterpolationTooDeep { .. })
        ));
    }

    #[test]
    fn test_broken_section_only_fails_when_read() {
        let doc = parse("[Main]\nprovider = Mock\n[IEX]\ntoken = %(missing)s\n");
        assert!(doc.section("Main").is_ok());
        assert!(doc.section("IEX").is_err());
    }

    #[test]
    fn test_missing_file_is_empty_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = SourceReader::default()
            .read(dir.path().join("absent.ini"))
            .expect("missing file tolerated");
        assert_eq!(doc.section_names().count(), 0);
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            SourceReader::default().read(dir.path()),
            Err(SourceError::Io { .. })
        ));
    }
}
