//! Session layer for device communication.
//!
//! The controller only talks to the [`Connector`] and [`Session`] traits.
//! The native API implementation lives in [`native`].

pub mod native;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::entity::{Catalog, SwitchState};
use crate::error::SessionError;

pub use native::NativeApiConnector;

/// Default port of the ESPHome native API.
pub const DEFAULT_PORT: u16 = 6053;

/// Default per-call timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Where to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Noise pre-shared key used to encrypt the session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    encryption_key: String,
}

impl Credentials {
    pub fn new(encryption_key: impl Into<String>) -> Self {
        Self {
            encryption_key: encryption_key.into(),
        }
    }

    pub fn encryption_key(&self) -> &str {
        &self.encryption_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("encryption_key", &"<redacted>")
            .finish()
    }
}

/// Tuning for the session client.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Deadline applied to connect, listing and each command.
    pub timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Opens sessions to a device.
pub trait Connector {
    type Session: Session;

    /// Open an authenticated, encrypted session.
    ///
    /// Fails with [`SessionError::Authentication`] or
    /// [`SessionError::Connectivity`]. No session exists after a failure.
    fn connect(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Self::Session, SessionError>>;
}

/// A live connection to one device.
pub trait Session {
    /// Retrieve every entity the device exposes, in device order.
    fn list_entities(&mut self) -> impl Future<Output = Result<Catalog, SessionError>>;

    /// Ask the device to move a switch to `state`.
    ///
    /// Completes once the session layer accepted the command, which says
    /// nothing about the relay having physically moved.
    fn switch_command(
        &mut self,
        key: u32,
        state: SwitchState,
    ) -> impl Future<Output = Result<(), SessionError>>;

    /// Close the session. Idempotent and infallible.
    fn disconnect(&mut self) -> impl Future<Output = ()>;
}
