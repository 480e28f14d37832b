//! Relay switch command.

use std::future::Future;
use std::io;
use std::time::Duration;

use esp_relay_core::{
    Connector, ControlConfig, ControlOutcome, ControlReporter, Credentials, NativeApiConnector,
    SessionOptions, SwitchController, SwitchState,
};

use crate::error::CliError;
use crate::output::{OutputFormatter, PrintReporter};

/// Validated inputs for one switch run.
#[derive(Debug)]
pub struct SwitchRequest {
    pub host: String,
    pub state: SwitchState,
    pub credentials: Credentials,
    /// Whether the key came from `--ekey` rather than the built-in default.
    pub key_from_cli: bool,
    pub port: u16,
    pub timeout: u64,
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Run the switch command
pub async fn run_switch(
    request: SwitchRequest,
    formatter: &dyn OutputFormatter,
) -> Result<(), CliError> {
    tracing::debug!(
        host = %request.host,
        port = request.port,
        timeout_ms = request.timeout,
        key_from_cli = request.key_from_cli,
        "switch request validated"
    );

    let options = SessionOptions {
        timeout: Duration::from_millis(request.timeout),
    };
    let config = ControlConfig::new(request.credentials).with_port(request.port);
    let controller = SwitchController::new(NativeApiConnector::new(options), config);

    let mut reporter = PrintReporter::new(formatter, io::stdout());
    execute(&controller, &request.host, request.state, &mut reporter, interrupted()).await
}

/// Drive one controller run and map its outcome onto the CLI result.
///
/// Everything the reporter prints is written before this returns, so a
/// caller printing the error afterwards keeps listing-then-error order.
pub async fn execute<C, R, F>(
    controller: &SwitchController<C>,
    host: &str,
    state: SwitchState,
    reporter: &mut R,
    cancel: F,
) -> Result<(), CliError>
where
    C: Connector,
    R: ControlReporter,
    F: Future<Output = ()>,
{
    match controller.run_until(host, state, reporter, cancel).await? {
        ControlOutcome::Switched { .. } => Ok(()),
        ControlOutcome::Unresolved { catalog } => Err(CliError::Unresolved {
            host: host.to_string(),
            count: catalog.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::exit_codes;
    use crate::output::TableOutput;
    use esp_relay_core::{Catalog, CoreError, Endpoint, Entity, Session, SessionError};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    const RELEASED: &str = "<released>";

    /// Byte sink shared between the reporter and the fake session.
    #[derive(Clone, Default)]
    struct SharedOut(Arc<Mutex<Vec<u8>>>);

    impl SharedOut {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedOut {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FakeConnector {
        catalog: Catalog,
        fail_dispatch: bool,
        out: SharedOut,
    }

    struct FakeSession {
        catalog: Catalog,
        fail_dispatch: bool,
        out: SharedOut,
    }

    impl Connector for FakeConnector {
        type Session = FakeSession;

        fn connect(
            &self,
            _endpoint: &Endpoint,
            _credentials: &Credentials,
        ) -> impl Future<Output = Result<FakeSession, SessionError>> {
            let session = FakeSession {
                catalog: self.catalog.clone(),
                fail_dispatch: self.fail_dispatch,
                out: self.out.clone(),
            };
            async move { Ok(session) }
        }
    }

    impl Session for FakeSession {
        async fn list_entities(&mut self) -> Result<Catalog, SessionError> {
            Ok(self.catalog.clone())
        }

        async fn switch_command(
            &mut self,
            _key: u32,
            _state: SwitchState,
        ) -> Result<(), SessionError> {
            if self.fail_dispatch {
                return Err(SessionError::Protocol {
                    host: "plug.local".to_string(),
                    message: "write failed".to_string(),
                });
            }
            Ok(())
        }

        async fn disconnect(&mut self) {
            writeln!(self.out, "{}", RELEASED).unwrap();
        }
    }

    fn controller(
        catalog: Catalog,
        fail_dispatch: bool,
        out: &SharedOut,
    ) -> SwitchController<FakeConnector> {
        let connector = FakeConnector {
            catalog,
            fail_dispatch,
            out: out.clone(),
        };
        SwitchController::new(connector, ControlConfig::new(Credentials::new("key")))
    }

    #[tokio::test]
    async fn test_confirmation_printed_before_release() {
        let out = SharedOut::default();
        let catalog = vec![
            Entity::new("uptime", "Uptime", "sensor", 1),
            Entity::new("relay", "Power Relay", "switch", 2),
        ];
        let controller = controller(catalog, false, &out);
        let formatter = TableOutput::new();
        let mut reporter = PrintReporter::new(&formatter, out.clone());

        let result = execute(
            &controller,
            "plug.local",
            SwitchState::On,
            &mut reporter,
            std::future::pending(),
        )
        .await;
        assert!(result.is_ok());

        let text = out.text();
        let announced = text.find("Controlling relay").unwrap();
        let confirmed = text.find("switched").unwrap();
        let released = text.find(RELEASED).unwrap();
        assert!(announced < confirmed);
        assert!(confirmed < released);
        assert_eq!(text.matches(RELEASED).count(), 1);
    }

    #[tokio::test]
    async fn test_unresolved_listing_printed_before_error() {
        let out = SharedOut::default();
        let catalog = vec![
            Entity::new("temp", "Temperature", "sensor", 1),
            Entity::new("status", "Status", "binary_sensor", 2),
        ];
        let controller = controller(catalog, false, &out);
        let formatter = TableOutput::new();
        let mut reporter = PrintReporter::new(&formatter, out.clone());

        let err = execute(
            &controller,
            "plug.local",
            SwitchState::Off,
            &mut reporter,
            std::future::pending(),
        )
        .await
        .unwrap_err();

        assert!(matches!(&err, CliError::Unresolved { count: 2, .. }));
        assert_eq!(err.exit_code(), exit_codes::NOT_RESOLVED);

        // the listing is complete by the time the caller can print the error
        let text = out.text();
        assert!(text.contains("Temperature"));
        assert!(text.contains("binary_sensor"));
        assert!(text.find("Found 2 entity(ies)").unwrap() < text.find(RELEASED).unwrap());
        assert!(!text.contains("switched"));
    }

    #[tokio::test]
    async fn test_dispatch_failure_skips_confirmation() {
        let out = SharedOut::default();
        let catalog = vec![Entity::new("relay", "Power Relay", "switch", 2)];
        let controller = controller(catalog, true, &out);
        let formatter = TableOutput::new();
        let mut reporter = PrintReporter::new(&formatter, out.clone());

        let err = execute(
            &controller,
            "plug.local",
            SwitchState::On,
            &mut reporter,
            std::future::pending(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Core(CoreError::Session(SessionError::Protocol { .. }))));
        assert_eq!(err.exit_code(), exit_codes::DEVICE_ERROR);

        let text = out.text();
        assert!(text.contains("Controlling relay"));
        assert!(!text.contains("switched"));
        assert_eq!(text.matches(RELEASED).count(), 1);
    }
}
