//! ESPHome native API session over `esphome-client`.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use esphome_client::types::{EspHomeMessage as Message, ListEntitiesRequest, SwitchCommandRequest};
use esphome_client::EspHomeClient;
use tokio::time::timeout;

use super::{Connector, Credentials, Endpoint, Session, SessionOptions};
use crate::entity::{Catalog, Entity, SwitchState};
use crate::error::SessionError;

/// Connect-stage error text that points at the key rather than the network.
const AUTH_MARKERS: &[&str] = &[
    "handshake",
    "noise",
    "psk",
    "encrypt",
    "decrypt",
    "key",
    "auth",
    "password",
];

/// Classify a connect failure as authentication or connectivity.
pub fn classify_connect_error(host: &str, message: String) -> SessionError {
    let lower = message.to_lowercase();

    if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
        SessionError::Authentication {
            host: host.to_string(),
            message,
        }
    } else {
        SessionError::Connectivity {
            host: host.to_string(),
            message,
        }
    }
}

/// Outcome of reading one message while listing entities.
#[derive(Debug, PartialEq, Eq)]
enum Listing {
    Entity(Entity),
    /// Switches also carry the sub-device they belong to.
    Switch { entity: Entity, device_id: u32 },
    Done,
    Ignored,
}

fn listed(object_id: String, name: String, component_type: &str, key: u32) -> Listing {
    Listing::Entity(Entity::new(object_id, name, component_type, key))
}

fn listing_from_message(message: Message) -> Listing {
    match message {
        Message::ListEntitiesSwitchResponse(e) => Listing::Switch {
            entity: Entity::new(e.object_id, e.name, "switch", e.key),
            device_id: e.device_id,
        },
        Message::ListEntitiesBinarySensorResponse(e) => {
            listed(e.object_id, e.name, "binary_sensor", e.key)
        }
        Message::ListEntitiesCoverResponse(e) => listed(e.object_id, e.name, "cover", e.key),
        Message::ListEntitiesFanResponse(e) => listed(e.object_id, e.name, "fan", e.key),
        Message::ListEntitiesLightResponse(e) => listed(e.object_id, e.name, "light", e.key),
        Message::ListEntitiesSensorResponse(e) => listed(e.object_id, e.name, "sensor", e.key),
        Message::ListEntitiesTextSensorResponse(e) => {
            listed(e.object_id, e.name, "text_sensor", e.key)
        }
        Message::ListEntitiesCameraResponse(e) => listed(e.object_id, e.name, "camera", e.key),
        Message::ListEntitiesClimateResponse(e) => listed(e.object_id, e.name, "climate", e.key),
        Message::ListEntitiesNumberResponse(e) => listed(e.object_id, e.name, "number", e.key),
        Message::ListEntitiesSelectResponse(e) => listed(e.object_id, e.name, "select", e.key),
        Message::ListEntitiesSirenResponse(e) => listed(e.object_id, e.name, "siren", e.key),
        Message::ListEntitiesLockResponse(e) => listed(e.object_id, e.name, "lock", e.key),
        Message::ListEntitiesButtonResponse(e) => listed(e.object_id, e.name, "button", e.key),
        Message::ListEntitiesMediaPlayerResponse(e) => {
            listed(e.object_id, e.name, "media_player", e.key)
        }
        Message::ListEntitiesAlarmControlPanelResponse(e) => {
            listed(e.object_id, e.name, "alarm_control_panel", e.key)
        }
        Message::ListEntitiesTextResponse(e) => listed(e.object_id, e.name, "text", e.key),
        Message::ListEntitiesDateResponse(e) => listed(e.object_id, e.name, "date", e.key),
        Message::ListEntitiesTimeResponse(e) => listed(e.object_id, e.name, "time", e.key),
        Message::ListEntitiesDateTimeResponse(e) => {
            listed(e.object_id, e.name, "datetime", e.key)
        }
        Message::ListEntitiesEventResponse(e) => listed(e.object_id, e.name, "event", e.key),
        Message::ListEntitiesValveResponse(e) => listed(e.object_id, e.name, "valve", e.key),
        Message::ListEntitiesUpdateResponse(e) => listed(e.object_id, e.name, "update", e.key),
        Message::ListEntitiesDoneResponse(_) => Listing::Done,
        // services, pings and state pushes are not entities
        _ => Listing::Ignored,
    }
}

/// Accumulates the entity listing until the device sends the done marker.
#[derive(Debug, Default)]
struct CatalogBuilder {
    catalog: Catalog,
    switch_devices: HashMap<u32, u32>,
}

impl CatalogBuilder {
    /// Feed one message; returns true once the listing is complete.
    fn push(&mut self, message: Message) -> bool {
        match listing_from_message(message) {
            Listing::Entity(entity) => self.catalog.push(entity),
            Listing::Switch { entity, device_id } => {
                self.switch_devices.insert(entity.key, device_id);
                self.catalog.push(entity);
            }
            Listing::Done => return true,
            Listing::Ignored => {}
        }
        false
    }
}

/// Opens native API sessions.
#[derive(Debug, Clone, Default)]
pub struct NativeApiConnector {
    options: SessionOptions,
}

impl NativeApiConnector {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }
}

impl Connector for NativeApiConnector {
    type Session = NativeApiSession;

    fn connect(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<NativeApiSession, SessionError>> {
        let host = endpoint.host.clone();
        let address = endpoint.address();
        let key = credentials.encryption_key().to_string();
        let deadline = self.options.timeout;

        async move {
            tracing::debug!(%address, "opening native API session");

            let connect = EspHomeClient::builder()
                .address(address.as_str())
                .key(key.as_str())
                .connect();

            let client = timeout(deadline, connect)
                .await
                .map_err(|_| SessionError::Connectivity {
                    host: host.clone(),
                    message: format!("connection timed out after {} ms", deadline.as_millis()),
                })?
                .map_err(|e| classify_connect_error(&host, e.to_string()))?;

            Ok(NativeApiSession {
                host,
                timeout: deadline,
                client: Some(client),
                switch_devices: HashMap::new(),
            })
        }
    }
}

/// A live native API connection.
pub struct NativeApiSession {
    host: String,
    timeout: Duration,
    client: Option<EspHomeClient>,
    /// Switch key to sub-device id, from the last listing.
    switch_devices: HashMap<u32, u32>,
}

impl NativeApiSession {
    fn protocol_error(&self, message: impl Into<String>) -> SessionError {
        SessionError::Protocol {
            host: self.host.clone(),
            message: message.into(),
        }
    }

    fn timed_out(&self, what: &str) -> SessionError {
        SessionError::Connectivity {
            host: self.host.clone(),
            message: format!("{} timed out after {} ms", what, self.timeout.as_millis()),
        }
    }
}

impl Session for NativeApiSession {
    async fn list_entities(&mut self) -> Result<Catalog, SessionError> {
        let deadline = self.timeout;
        let Some(client) = self.client.as_mut() else {
            return Err(self.protocol_error("session is closed"));
        };

        let listing = timeout(deadline, async {
            client
                .try_write(ListEntitiesRequest {})
                .await
                .map_err(|e| format!("list request failed: {}", e))?;

            let mut builder = CatalogBuilder::default();
            loop {
                let message = client
                    .try_read()
                    .await
                    .map_err(|e| format!("reading entity list failed: {}", e))?;

                if builder.push(message) {
                    return Ok::<CatalogBuilder, String>(builder);
                }
            }
        })
        .await;

        match listing {
            Ok(Ok(builder)) => {
                tracing::debug!(entities = builder.catalog.len(), "entity listing complete");
                self.switch_devices = builder.switch_devices;
                Ok(builder.catalog)
            }
            Ok(Err(message)) => Err(self.protocol_error(message)),
            Err(_) => Err(self.timed_out("entity listing")),
        }
    }

    async fn switch_command(&mut self, key: u32, state: SwitchState) -> Result<(), SessionError> {
        let deadline = self.timeout;
        let device_id = self.switch_devices.get(&key).copied().unwrap_or_default();
        let Some(client) = self.client.as_mut() else {
            return Err(self.protocol_error("session is closed"));
        };

        let request = SwitchCommandRequest {
            key,
            state: state.as_bool(),
            device_id,
        };

        match timeout(deadline, client.try_write(request)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(self.protocol_error(format!("switch command failed: {}", e))),
            Err(_) => Err(self.timed_out("switch command")),
        }
    }

    async fn disconnect(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };

        if let Err(e) = client.close().await {
            tracing::warn!(host = %self.host, error = %e, "error while closing session");
        }
    }
}
