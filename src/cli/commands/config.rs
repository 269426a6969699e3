//! Implementation of the `inkystock config` commands.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use crate::cli::display::{action_success, list_table, render_list};
use crate::cli::output::{output, redact_at, CommandOutput};
use crate::cli::types::{ConfigCommands, GlobalArgs};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub valid: bool,
    pub path: PathBuf,
    pub provider: String,
    pub credentials: &'static str,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        action_success(&format!(
            "{} is valid (provider {}, credentials: {})",
            self.path.display(),
            self.provider,
            self.credentials
        ))
    }
}

/// One rendered `section / field / value` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub section: String,
    pub field: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub path: PathBuf,
    /// Section name to field map, credentials redacted
    pub sections: Value,
    #[serde(skip)]
    pub rows: Vec<FieldRow>,
}

impl ShowOutput {
    pub fn new(path: PathBuf, config: &Config) -> Self {
        let mut sections = serde_json::to_value(config).unwrap_or_default();
        redact_at(&mut sections, "/credentials/token");

        let rows = match &sections {
            Value::Object(map) => map
                .iter()
                .flat_map(|(section, fields)| section_rows(section, fields))
                .collect(),
            _ => Vec::new(),
        };

        Self {
            path,
            sections,
            rows,
        }
    }
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["section", "field", "value"]);
        for row in &self.rows {
            table.add_row(vec![row.section.as_str(), row.field.as_str(), row.value.as_str()]);
        }
        format!(
            "{}\n\n{}",
            self.path.display(),
            render_list("field", &table, self.rows.len())
        )
    }

    fn to_json(&self) -> Value {
        serde_json::json!({
            "path": self.path,
            "sections": self.sections,
        })
    }
}

fn section_rows(section: &str, fields: &Value) -> Vec<FieldRow> {
    let Value::Object(fields) = fields else {
        return Vec::new();
    };
    fields
        .iter()
        .map(|(field, value)| FieldRow {
            section: section.to_string(),
            field: field.clone(),
            value: match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        })
        .collect()
}

pub fn execute(command: ConfigCommands, global: &GlobalArgs) -> Result<()> {
    // Installed at the default level so resolution warnings are visible
    let logger = LoggerImpl::init(
        &LogConfig::default()
            .with_format(global.log_format)
            .with_log_dir(global.log_dir.clone()),
    )?;

    let config = ConfigLoader::resolve(&global.config, &global.env_allowlist).with_context(|| {
        format!(
            "Failed to resolve configuration from {}",
            global.config.display()
        )
    })?;

    logger.set_level(config.main.log_level())?;
    info!(
        path = %global.config.display(),
        provider = %config.main.provider,
        "configuration loaded"
    );

    match command {
        ConfigCommands::Check => {
            let credentials = match config.credentials.provider() {
                Some(provider) => provider.identifier(),
                None => "none required",
            };
            let result = CheckOutput {
                valid: true,
                path: global.config.clone(),
                provider: config.main.provider.clone(),
                credentials,
            };
            output(&result, global.json);
        }
        ConfigCommands::Show => {
            output(&ShowOutput::new(global.config.clone(), &config), global.json);
        }
    }

    Ok(())
}
