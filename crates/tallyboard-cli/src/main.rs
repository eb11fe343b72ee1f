mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use tallyboard_client::ClientError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stdout_io::write_stdout_line;

const LOG_ENV: &str = "TALLYBOARD_LOG";
const DEFAULT_LOG_DIRECTIVE: &str = "warn";

const COMMAND_NAMES: [&str; 10] = [
    "daily",
    "trends",
    "savings",
    "grocery-vs-restaurant",
    "stats",
    "count",
    "analytics",
    "library",
    "invalidate",
    "reload",
];

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) | Err(code) => code,
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if write_stdout_line(err.to_string().trim_end()).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }

            let parse_error = ClientError::invalid_argument_for_command(
                &strip_clap_boilerplate(&err.to_string()),
                command_name_from_args(&raw_args),
            );
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

/// Drops clap's usage footer; recovery steps carry the help hint instead.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = message
        .find("\n\nUsage:")
        .or_else(|| message.find("\nFor more information"))
        .map_or(message, |pos| &message[..pos]);
    trimmed
        .trim_start_matches("error: ")
        .trim_end()
        .to_string()
}

fn command_name_from_args(raw_args: &[String]) -> Option<&'static str> {
    raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))
        .and_then(|value| COMMAND_NAMES.iter().copied().find(|name| name == value))
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}
