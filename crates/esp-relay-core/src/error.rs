//! Error types for ESP-Relay core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Interrupted before the command completed")]
    Interrupted,
}

/// Failures raised by the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Authentication with {host} failed: {message}")]
    Authentication { host: String, message: String },

    #[error("Could not reach {host}: {message}")]
    Connectivity { host: String, message: String },

    #[error("Protocol error talking to {host}: {message}")]
    Protocol { host: String, message: String },
}

/// Invocation configuration errors, detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No default encryption key is configured and no --ekey was provided")]
    MissingEncryptionKey,

    #[error("Invalid action '{0}': expected 'on' or 'off'")]
    InvalidAction(String),
}
