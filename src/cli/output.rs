//! Output formatting utilities for the CLI.

use serde::Serialize;
use serde_json::Value;

/// Stand-in printed for secrets such as provider tokens.
pub const REDACTED: &str = "********";

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Render a command result as pretty JSON or human text.
pub fn render<T: CommandOutput>(result: &T, json_mode: bool) -> String {
    if json_mode {
        serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
    } else {
        result.to_human()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    println!("{}", render(result, json_mode));
}

/// Mask a secret; an empty secret stays empty so "unset" remains visible.
pub fn redact(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        REDACTED.to_string()
    }
}

/// Replace the string at `pointer` in `value` with its redacted form.
pub fn redact_at(value: &mut Value, pointer: &str) {
    if let Some(Value::String(secret)) = value.pointer_mut(pointer) {
        *secret = redact(secret);
    }
}
