//! Entity descriptors reported by a device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Component type string the device uses for relay-like switches.
pub const SWITCH_COMPONENT: &str = "switch";

/// A read-only descriptor of something the device exposes.
///
/// Identifying strings are always present but may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub object_id: String,
    pub display_name: String,
    pub component_type: String,
    /// Reference used to address this entity in later calls.
    pub key: u32,
}

impl Entity {
    pub fn new(
        object_id: impl Into<String>,
        display_name: impl Into<String>,
        component_type: impl Into<String>,
        key: u32,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            display_name: display_name.into(),
            component_type: component_type.into(),
            key,
        }
    }

    pub fn is_switch(&self) -> bool {
        self.component_type == SWITCH_COMPONENT
    }
}

/// Entities in the order the device reported them.
pub type Catalog = Vec<Entity>;

/// Desired relay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    pub fn as_bool(self) -> bool {
        matches!(self, SwitchState::On)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwitchState::On => "ON",
            SwitchState::Off => "OFF",
        }
    }
}

impl FromStr for SwitchState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(SwitchState::On),
            "off" => Ok(SwitchState::Off),
            _ => Err(ConfigError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
