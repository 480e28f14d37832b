//! ESP-Relay CLI - switch an ESPHome device's power relay over the native API.
//!
//! Connects straight to the device, picks the entity that looks like the
//! power relay, and turns it on or off. No Home Assistant needed.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use esp_relay_core::BUILTIN_ENCRYPTION_KEY;

use cli::{parse_args, print_usage, Cli, Invocation};
use error::{exit_codes, CliError};
use output::{get_formatter, OutputFormatter};

#[tokio::main]
async fn main() {
    let cli = match parse_args(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Usage) => {
            print_usage();
            std::process::exit(exit_codes::NO_ACTION);
        }
        Err(e) => e.exit(),
    };

    logging::init(cli.verbose);

    let formatter = get_formatter(cli.json);
    let result = run(cli, formatter.as_ref()).await;
    std::process::exit(finish(result, formatter.as_ref()));
}

async fn run(cli: Cli, formatter: &dyn OutputFormatter) -> Result<(), CliError> {
    let request = cli.into_request(BUILTIN_ENCRYPTION_KEY)?;
    commands::run_switch(request, formatter).await
}

/// Print whatever the result calls for and return the exit code.
fn finish(result: Result<(), CliError>, formatter: &dyn OutputFormatter) -> i32 {
    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(CliError::Usage) => {
            print_usage();
            exit_codes::NO_ACTION
        }
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e.to_string()));
            if e.shows_usage() {
                print_usage();
            }
            e.exit_code()
        }
    }
}
