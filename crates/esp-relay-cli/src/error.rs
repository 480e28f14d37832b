//! Error types for ESP-Relay CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use esp_relay_core::error::CoreError;
use thiserror::Error;

pub use esp_relay_core::error::{ConfigError, SessionError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// Usage was printed and nothing was attempted.
    pub const NO_ACTION: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const DEVICE_ERROR: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
    pub const AUTH_ERROR: i32 = 5;
    pub const NOT_RESOLVED: i32 = 6;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Missing --host or a valid --action")]
    Usage,

    #[error("Could not identify a relay entity on {host} ({count} entities discovered)")]
    Unresolved { host: String, count: usize },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Session(SessionError::Authentication { .. }) => exit_codes::AUTH_ERROR,
                CoreError::Session(SessionError::Connectivity { .. }) => exit_codes::NETWORK_ERROR,
                CoreError::Session(SessionError::Protocol { .. }) => exit_codes::DEVICE_ERROR,
                CoreError::Config(_) => exit_codes::INVALID_ARGS,
                CoreError::Interrupted => exit_codes::GENERAL_ERROR,
            },
            CliError::Usage => exit_codes::NO_ACTION,
            CliError::Unresolved { .. } => exit_codes::NOT_RESOLVED,
        }
    }

    /// Whether usage text should accompany this error.
    pub fn shows_usage(&self) -> bool {
        matches!(self, CliError::Usage | CliError::Core(CoreError::Config(_)))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Core(CoreError::Config(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let auth: CliError = CoreError::Session(SessionError::Authentication {
            host: "plug.local".to_string(),
            message: "bad key".to_string(),
        })
        .into();
        assert_eq!(auth.exit_code(), exit_codes::AUTH_ERROR);

        let net: CliError = CoreError::Session(SessionError::Connectivity {
            host: "plug.local".to_string(),
            message: "timed out".to_string(),
        })
        .into();
        assert_eq!(net.exit_code(), exit_codes::NETWORK_ERROR);

        let missing_key: CliError = ConfigError::MissingEncryptionKey.into();
        assert_eq!(missing_key.exit_code(), exit_codes::INVALID_ARGS);

        assert_eq!(CliError::Usage.exit_code(), exit_codes::NO_ACTION);
        assert_eq!(
            CliError::Unresolved { host: "plug.local".to_string(), count: 3 }.exit_code(),
            exit_codes::NOT_RESOLVED
        );
    }

    #[test]
    fn test_shows_usage() {
        assert!(CliError::Usage.shows_usage());
        assert!(CliError::from(ConfigError::MissingEncryptionKey).shows_usage());
        assert!(!CliError::Core(CoreError::Interrupted).shows_usage());
    }
}
