//! ESP-Relay core - shared library for switching ESPHome power relays.
//!
//! Resolves which of a device's entities is the power relay and drives a
//! single connect, list, dispatch, disconnect cycle over the native API.

pub mod config;
pub mod control;
pub mod entity;
pub mod error;
pub mod resolver;
pub mod session;

pub use config::{resolve_encryption_key, ControlConfig, BUILTIN_ENCRYPTION_KEY};
pub use control::{ControlOutcome, ControlReporter, SwitchController};
pub use entity::{Catalog, Entity, SwitchState};
pub use error::{ConfigError, CoreError, SessionError};
pub use session::{Connector, Credentials, Endpoint, NativeApiConnector, Session, SessionOptions};
