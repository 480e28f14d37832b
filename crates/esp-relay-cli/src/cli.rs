//! CLI argument definitions using clap.

use std::ffi::OsString;

use clap::{CommandFactory, Parser};

use esp_relay_core::session::{DEFAULT_PORT, DEFAULT_TIMEOUT_MS};
use esp_relay_core::{resolve_encryption_key, SwitchState};

use crate::commands::switch::SwitchRequest;
use crate::error::CliError;

const EXAMPLES: &str = "\
Examples:
  esp-relay --host=192.168.2.230 --action=on
  esp-relay --host=esphome-jetkvm-power-control.local --action=off
  esp-relay --host=esphome-jetkvm-power-control.local --action=on --ekey=\"Your_Encryption_Key_Here\"";

/// ESP-Relay - switch the power relay of an ESPHome device without a hub
#[derive(Parser, Debug)]
#[command(name = "esp-relay")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Device hostname or IP address
    #[arg(long)]
    pub host: Option<String>,

    /// Relay action: on or off (case-insensitive)
    #[arg(long)]
    pub action: Option<String>,

    /// Native API encryption key (overrides the built-in key)
    #[arg(long)]
    pub ekey: Option<String>,

    /// Native API port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Per-call timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS, env = "ESP_RELAY_TIMEOUT")]
    pub timeout: u64,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Invocation {
    /// Too few arguments to attempt anything.
    Usage,
    Run(Cli),
}

/// Parse raw arguments, program name included.
pub fn parse_args<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    // program name plus at least host and action
    if args.len() < 3 {
        return Ok(Invocation::Usage);
    }
    Cli::try_parse_from(args).map(Invocation::Run)
}

impl Cli {
    /// Requested relay state; anything other than on/off counts as absent.
    pub fn switch_state(&self) -> Option<SwitchState> {
        self.action.as_deref().and_then(|a| a.parse().ok())
    }

    /// Validate into a switch request. Nothing here touches the network.
    pub fn into_request(self, builtin_key: Option<&str>) -> Result<SwitchRequest, CliError> {
        let state = self.switch_state();
        let host = self.host.filter(|h| !h.is_empty());
        let (Some(host), Some(state)) = (host, state) else {
            return Err(CliError::Usage);
        };

        let credentials = resolve_encryption_key(builtin_key, self.ekey.as_deref())?;
        let key_from_cli = self.ekey.as_deref().is_some_and(|k| !k.is_empty());

        Ok(SwitchRequest {
            host,
            state,
            credentials,
            key_from_cli,
            port: self.port,
            timeout: self.timeout,
        })
    }
}

/// Print usage and examples to stdout.
pub fn print_usage() {
    let mut command = Cli::command();
    if command.print_help().is_err() {
        println!("{}", command.render_usage());
    }
    println!();
}
