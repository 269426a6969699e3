use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::schema::{ConfigSection, FieldKind, FieldSpec, FieldValue, FieldValues, SectionSchema};

/// Fully validated inkystock configuration
///
/// Built once at startup by the config loader and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub main: MainSection,
    pub outputs: OutputsSection,
    pub fonts: FontsSection,
    pub mascot: MascotSection,
    /// Credentials of the provider selected by `main.provider`
    pub credentials: ProviderCredentials,
}

const DEFAULT_CURRENCY: &str = "EUR";
const DEFAULT_DATABASE: &str = "sqlite:////tmp/inkystock.db";
const DEFAULT_CRYPTO: &str = "BTC";
const DEFAULT_LOGLEVEL: &str = "INFO";

const DEFAULT_SCREEN: &str = "inky";
const DEFAULT_LOCAL_OUTPUT: &str = "./data/out.png";

const DEFAULT_TICKER_FONT: &str = "./resources/fonts/04B_03__.TTF";
const DEFAULT_SYMBOL_FONT: &str = "./resources/fonts/04B_21__.TTF";
const DEFAULT_STATUSBAR_FONT: &str = "./resources/fonts/CozetteVector.ttf";
const DEFAULT_HEADLINE_FONT: &str = "./resources/fonts/04B_30__.TTF";

const DEFAULT_IEX_ENDPOINT: &str = "https://cloud.iexapis.com/stable";

/// Reason reported by the uppercase rules.
pub const MUST_BE_UPPERCASE: &str = "must be uppercase";

/// Reason reported when both `stock` and `crypto` are set.
pub const STOCK_OR_CRYPTO: &str = "one of either stock or crypto must be specified";

/// `[Main]` section: what to track and how the display is shaped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MainSection {
    /// Display currency, uppercase ISO code
    pub currency: String,

    /// Price cache location
    pub database: String,

    /// Stock symbol to track, empty when tracking crypto
    pub stock: String,

    /// Crypto symbol to track, empty when tracking a stock
    pub crypto: String,

    /// Price-data provider identifier, e.g. `IEX`
    pub provider: String,

    pub display_width_pixels: i64,
    pub display_height_pixels: i64,
    pub display_diagonal_inches: f64,
    pub rotate_display: i64,

    /// One of NOTSET, CRITICAL, ERROR, WARNING, INFO, DEBUG
    pub loglevel: String,
}

impl ConfigSection for MainSection {
    const SCHEMA: SectionSchema = SectionSchema {
        name: "Main",
        fields: &[
            FieldSpec {
                name: "currency",
                kind: FieldKind::Text,
                default: Some(DEFAULT_CURRENCY),
                rules: &[uppercase],
            },
            FieldSpec {
                name: "database",
                kind: FieldKind::Text,
                default: Some(DEFAULT_DATABASE),
                rules: &[],
            },
            FieldSpec {
                name: "stock",
                kind: FieldKind::Text,
                default: Some(""),
                rules: &[stock_without_crypto],
            },
            FieldSpec {
                name: "crypto",
                kind: FieldKind::Text,
                default: Some(DEFAULT_CRYPTO),
                rules: &[crypto_without_stock],
            },
            FieldSpec {
                name: "provider",
                kind: FieldKind::Text,
                default: None,
                rules: &[],
            },
            FieldSpec {
                name: "display_width_pixels",
                kind: FieldKind::Integer,
                default: Some("212"),
                rules: &[],
            },
            FieldSpec {
                name: "display_height_pixels",
                kind: FieldKind::Integer,
                default: Some("104"),
                rules: &[],
            },
            FieldSpec {
                name: "display_diagonal_inches",
                kind: FieldKind::Float,
                default: Some("2.13"),
                rules: &[],
            },
            FieldSpec {
                name: "rotate_display",
                kind: FieldKind::Integer,
                default: Some("0"),
                rules: &[],
            },
            FieldSpec {
                name: "loglevel",
                kind: FieldKind::Text,
                default: Some(DEFAULT_LOGLEVEL),
                rules: &[uppercase, known_loglevel],
            },
        ],
    };
}

/// What the ticker is configured to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracked<'a> {
    Stock(&'a str),
    Crypto(&'a str),
    Nothing,
}

impl MainSection {
    pub fn tracked(&self) -> Tracked<'_> {
        if !self.stock.is_empty() {
            Tracked::Stock(&self.stock)
        } else if !self.crypto.is_empty() {
            Tracked::Crypto(&self.crypto)
        } else {
            Tracked::Nothing
        }
    }

    /// Parsed log level. The loglevel rule guarantees this parses.
    pub fn log_level(&self) -> LogLevel {
        self.loglevel.parse().unwrap_or_default()
    }

    /// Credentialed provider selected by `provider`, if any.
    pub fn credentialed_provider(&self) -> Option<CredentialedProvider> {
        CredentialedProvider::from_identifier(&self.provider)
    }
}

/// `[Outputs]` section: where rendered frames go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputsSection {
    /// Display driver name
    pub screen: String,

    /// Path of the locally written image
    pub local: String,
}

impl Default for OutputsSection {
    fn default() -> Self {
        Self {
            screen: DEFAULT_SCREEN.to_string(),
            local: DEFAULT_LOCAL_OUTPUT.to_string(),
        }
    }
}

impl ConfigSection for OutputsSection {
    const SCHEMA: SectionSchema = SectionSchema {
        name: "Outputs",
        fields: &[
            FieldSpec {
                name: "screen",
                kind: FieldKind::Text,
                default: Some(DEFAULT_SCREEN),
                rules: &[],
            },
            FieldSpec {
                name: "local",
                kind: FieldKind::Text,
                default: Some(DEFAULT_LOCAL_OUTPUT),
                rules: &[],
            },
        ],
    };
}

/// `[Fonts]` section: font files and point sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FontsSection {
    pub ticker: String,
    pub ticker_size: i64,
    pub symbol: String,
    pub symbol_size: i64,
    pub statusbar: String,
    pub statusbar_size: i64,
    pub headline: String,
    pub headline_size: i64,
    pub chart: String,
    pub chart_size: f64,
}

impl ConfigSection for FontsSection {
    const SCHEMA: SectionSchema = SectionSchema {
        name: "Fonts",
        fields: &[
            FieldSpec {
                name: "ticker",
                kind: FieldKind::Text,
                default: Some(DEFAULT_TICKER_FONT),
                rules: &[],
            },
            FieldSpec {
                name: "ticker_size",
                kind: FieldKind::Integer,
                default: Some("8"),
                rules: &[],
            },
            FieldSpec {
                name: "symbol",
                kind: FieldKind::Text,
                default: Some(DEFAULT_SYMBOL_FONT),
                rules: &[],
            },
            FieldSpec {
                name: "symbol_size",
                kind: FieldKind::Integer,
                default: Some("10"),
                rules: &[],
            },
            FieldSpec {
                name: "statusbar",
                kind: FieldKind::Text,
                default: Some(DEFAULT_STATUSBAR_FONT),
                rules: &[],
            },
            FieldSpec {
                name: "statusbar_size",
                kind: FieldKind::Integer,
                default: Some("12"),
                rules: &[],
            },
            FieldSpec {
                name: "headline",
                kind: FieldKind::Text,
                default: Some(DEFAULT_HEADLINE_FONT),
                rules: &[],
            },
            FieldSpec {
                name: "headline_size",
                kind: FieldKind::Integer,
                default: Some("30"),
                rules: &[],
            },
            FieldSpec {
                name: "chart",
                kind: FieldKind::Text,
                default: Some(DEFAULT_TICKER_FONT),
                rules: &[],
            },
            FieldSpec {
                name: "chart_size",
                kind: FieldKind::Float,
                default: Some("5.2"),
                rules: &[],
            },
        ],
    };
}

/// `[Mascot]` section: images shown for each price trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MascotSection {
    pub increasing: String,
    pub decreasing: String,
    /// Image for an unchanged price, `static` in the file
    #[serde(rename = "static")]
    pub unchanged: String,
}

impl ConfigSection for MascotSection {
    const SCHEMA: SectionSchema = SectionSchema {
        name: "Mascot",
        fields: &[
            FieldSpec {
                name: "increasing",
                kind: FieldKind::Text,
                default: Some("./resources/pixelcat/pixelcat_cool.png"),
                rules: &[],
            },
            FieldSpec {
                name: "decreasing",
                kind: FieldKind::Text,
                default: Some("./resources/pixelcat/pixelcat_worried.png"),
                rules: &[],
            },
            FieldSpec {
                name: "static",
                kind: FieldKind::Text,
                default: Some("./resources/pixelcat/pixelcat_sleeping.png"),
                rules: &[],
            },
        ],
    };
}

/// `[IEX]` section: IEX Cloud credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IexSection {
    /// API token
    pub token: String,

    /// API base URL
    pub endpoint: Url,
}

impl ConfigSection for IexSection {
    const SCHEMA: SectionSchema = SectionSchema {
        name: "IEX",
        fields: &[
            FieldSpec {
                name: "token",
                kind: FieldKind::Text,
                default: None,
                rules: &[],
            },
            FieldSpec {
                name: "endpoint",
                kind: FieldKind::Url,
                default: Some(DEFAULT_IEX_ENDPOINT),
                rules: &[],
            },
        ],
    };
}

/// Providers that need their own credential section.
///
/// Adding a provider means adding a variant here, a section type, and a
/// branch in the loader's credential dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CredentialedProvider {
    Iex,
}

impl CredentialedProvider {
    /// Value of `Main.provider` that selects this provider.
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Iex => "IEX",
        }
    }

    /// Name of the section holding this provider's credentials.
    pub const fn section(self) -> &'static str {
        match self {
            Self::Iex => IexSection::SCHEMA.name,
        }
    }

    /// Exact, case-sensitive match on the provider identifier.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "IEX" => Some(Self::Iex),
            _ => None,
        }
    }
}

/// Credentials of the selected provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderCredentials {
    Iex(IexSection),
    /// No credentialed provider selected; stands in with an empty token.
    Placeholder,
}

impl ProviderCredentials {
    pub fn token(&self) -> &str {
        match self {
            Self::Iex(iex) => &iex.token,
            Self::Placeholder => "",
        }
    }

    pub fn endpoint(&self) -> Option<&Url> {
        match self {
            Self::Iex(iex) => Some(&iex.endpoint),
            Self::Placeholder => None,
        }
    }

    pub fn provider(&self) -> Option<CredentialedProvider> {
        match self {
            Self::Iex(_) => Some(CredentialedProvider::Iex),
            Self::Placeholder => None,
        }
    }
}

/// Log levels accepted by `Main.loglevel`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    NotSet,
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub const ALL: [Self; 6] = [
        Self::NotSet,
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Info,
        Self::Debug,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotSet => "NOTSET",
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|level| level.as_str()).collect();
                format!("loglevel must be one of [{}]", names.join(", "))
            })
    }
}

fn uppercase(value: FieldValue, _: &FieldValues) -> Result<FieldValue, String> {
    match value.as_text() {
        Some(text) if text != text.to_uppercase() => Err(MUST_BE_UPPERCASE.to_string()),
        _ => Ok(value),
    }
}

fn known_loglevel(value: FieldValue, _: &FieldValues) -> Result<FieldValue, String> {
    if let Some(text) = value.as_text() {
        text.parse::<LogLevel>()?;
    }
    Ok(value)
}

fn exclusive_with(
    other: &str,
    value: FieldValue,
    siblings: &FieldValues,
) -> Result<FieldValue, String> {
    let set = value.as_text().is_some_and(|text| !text.is_empty());
    let other_set = siblings.text(other).is_some_and(|text| !text.is_empty());
    if set && other_set {
        return Err(STOCK_OR_CRYPTO.to_string());
    }
    Ok(value)
}

fn stock_without_crypto(value: FieldValue, siblings: &FieldValues) -> Result<FieldValue, String> {
    exclusive_with("crypto", value, siblings)
}

fn crypto_without_stock(value: FieldValue, siblings: &FieldValues) -> Result<FieldValue, String> {
    exclusive_with("stock", value, siblings)
}
