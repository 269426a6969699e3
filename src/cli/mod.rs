//! Command-line interface
//!
//! A thin front end over the config loader: resolve a file, report the
//! first violation, or print the validated sections.

pub mod commands;
pub mod display;
pub mod output;
pub mod types;

pub use types::{Cli, Commands, ConfigCommands, GlobalArgs};

use crate::infrastructure::config::ConfigError;

/// Print a command failure and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let violation = err
            .downcast_ref::<ConfigError>()
            .and_then(ConfigError::validation);
        let body = match violation {
            Some(v) => serde_json::json!({
                "error": format!("{err:#}"),
                "section": v.section,
                "field": v.field,
                "reason": v.reason,
            }),
            None => serde_json::json!({ "error": format!("{err:#}") }),
        };
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
