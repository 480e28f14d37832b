//! Relay control: connect, list, resolve, dispatch, report, disconnect.

use std::fmt;
use std::future::Future;

use crate::config::ControlConfig;
use crate::entity::{Catalog, Entity, SwitchState};
use crate::error::CoreError;
use crate::resolver::resolve;
use crate::session::{Connector, Endpoint, Session};

/// Lifecycle of one control run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Connecting,
    Listing,
    Resolving,
    ReportingUnresolved,
    Dispatching,
    Disconnecting,
    Done,
}

impl ControlState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlState::Idle => "idle",
            ControlState::Connecting => "connecting",
            ControlState::Listing => "listing",
            ControlState::Resolving => "resolving",
            ControlState::ReportingUnresolved => "reporting-unresolved",
            ControlState::Dispatching => "dispatching",
            ControlState::Disconnecting => "disconnecting",
            ControlState::Done => "done",
        }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enter(state: ControlState) {
    tracing::debug!(state = %state, "control state");
}

/// Receives user-facing reports while a run is in progress.
pub trait ControlReporter {
    /// No entity could be selected; `catalog` is everything the device listed.
    fn unresolved(&mut self, host: &str, catalog: &[Entity]);

    /// `target` was selected and the command is about to be sent.
    fn dispatching(&mut self, target: &Entity, state: SwitchState);

    /// The session layer accepted the command.
    fn switched(&mut self, target: &Entity, state: SwitchState);
}

/// How a run ended when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    Switched { target: Entity, state: SwitchState },
    Unresolved { catalog: Catalog },
}

/// Drives one relay command against one device.
pub struct SwitchController<C> {
    connector: C,
    config: ControlConfig,
}

impl<C: Connector> SwitchController<C> {
    pub fn new(connector: C, config: ControlConfig) -> Self {
        Self { connector, config }
    }

    /// Run to completion.
    pub async fn run<R: ControlReporter>(
        &self,
        host: &str,
        state: SwitchState,
        reporter: &mut R,
    ) -> Result<ControlOutcome, CoreError> {
        self.run_until(host, state, reporter, std::future::pending())
            .await
    }

    /// Run until done or until `cancel` completes.
    ///
    /// Once a session is open it is disconnected exactly once, whether the
    /// run succeeds, fails or is cancelled.
    #[tracing::instrument(skip(self, reporter, cancel), fields(port = self.config.port))]
    pub async fn run_until<R, F>(
        &self,
        host: &str,
        state: SwitchState,
        reporter: &mut R,
        cancel: F,
    ) -> Result<ControlOutcome, CoreError>
    where
        R: ControlReporter,
        F: Future<Output = ()>,
    {
        enter(ControlState::Idle);
        let endpoint = Endpoint::new(host, self.config.port);
        tokio::pin!(cancel);

        enter(ControlState::Connecting);
        let mut session = tokio::select! {
            biased;
            connected = self.connector.connect(&endpoint, &self.config.credentials) => connected?,
            () = &mut cancel => {
                enter(ControlState::Done);
                return Err(CoreError::Interrupted);
            }
        };

        let result = tokio::select! {
            biased;
            result = drive(&mut session, host, state, reporter) => result,
            () = &mut cancel => {
                tracing::warn!("interrupted, closing session");
                Err(CoreError::Interrupted)
            }
        };

        enter(ControlState::Disconnecting);
        session.disconnect().await;
        enter(ControlState::Done);

        result
    }
}

async fn drive<S, R>(
    session: &mut S,
    host: &str,
    state: SwitchState,
    reporter: &mut R,
) -> Result<ControlOutcome, CoreError>
where
    S: Session,
    R: ControlReporter,
{
    enter(ControlState::Listing);
    let catalog = session.list_entities().await?;

    enter(ControlState::Resolving);
    let Some(target) = resolve(&catalog).cloned() else {
        enter(ControlState::ReportingUnresolved);
        tracing::info!(entities = catalog.len(), "no relay entity identified");
        reporter.unresolved(host, &catalog);
        return Ok(ControlOutcome::Unresolved { catalog });
    };

    enter(ControlState::Dispatching);
    tracing::info!(object_id = %target.object_id, key = target.key, "relay entity selected");
    reporter.dispatching(&target, state);
    session.switch_command(target.key, state).await?;
    reporter.switched(&target, state);

    Ok(ControlOutcome::Switched { target, state })
}
