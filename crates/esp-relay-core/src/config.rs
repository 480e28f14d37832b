//! Per-invocation control configuration.
//!
//! Everything here is settled before any network activity.

use crate::error::ConfigError;
use crate::session::{Credentials, DEFAULT_PORT};

/// Encryption key baked in at build time, if any.
pub const BUILTIN_ENCRYPTION_KEY: Option<&str> = option_env!("ESP_RELAY_ENCRYPTION_KEY");

/// Pick the encryption key for this run.
///
/// A non-empty `override_key` always wins. Without a non-empty built-in
/// default the override is mandatory.
pub fn resolve_encryption_key(
    builtin: Option<&str>,
    override_key: Option<&str>,
) -> Result<Credentials, ConfigError> {
    let non_empty = |k: &&str| !k.is_empty();

    override_key
        .filter(non_empty)
        .or_else(|| builtin.filter(non_empty))
        .map(Credentials::new)
        .ok_or(ConfigError::MissingEncryptionKey)
}

/// Connection settings the controller is constructed with.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub port: u16,
    pub credentials: Credentials,
}

impl ControlConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            port: DEFAULT_PORT,
            credentials,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
