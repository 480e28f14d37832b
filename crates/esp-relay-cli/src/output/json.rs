//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::json;

use super::OutputFormatter;
use esp_relay_core::{Entity, SwitchState};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_dispatching(&self, _target: &Entity, _state: SwitchState) -> Option<String> {
        None
    }

    fn format_switched(&self, target: &Entity, state: SwitchState) -> String {
        Self::to_json(&json!({
            "success": true,
            "entity": target,
            "state": state
        }))
    }

    fn format_unresolved(&self, host: &str, catalog: &[Entity]) -> String {
        Self::to_json(&json!({
            "success": false,
            "host": host,
            "error": "Could not automatically identify relay entity",
            "entities": catalog,
            "count": catalog.len()
        }))
    }

    fn format_error(&self, error: &str) -> String {
        Self::to_json(&json!({
            "success": false,
            "error": error
        }))
    }
}
