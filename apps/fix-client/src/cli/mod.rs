//! Command-line interface
//!
//! Global options plus one module per command. Each request command
//! validates its arguments into an [`Intent`] before touching the network,
//! then hands it to the orchestrator.

pub mod complete;
pub mod display;
pub mod marketdata;
pub mod order;
pub mod securitylist;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::application::services::{Orchestrator, Outcome};
use crate::domain::intent::Intent;
use crate::error::FixClientError;
use crate::infrastructure::config::{load_config, resolve_context};
use crate::infrastructure::engine::SocketEngine;

/// FIX protocol client
#[derive(Parser, Debug)]
#[command(name = "fix")]
#[command(about = "Send FIX requests to a counterparty acceptor")]
#[command(version)]
pub struct Cli {
    /// Options shared by every command
    #[command(flatten)]
    pub globals: GlobalArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file
    #[arg(long, global = true, env = "FIX_CONFIG", default_value = "fix.yaml")]
    pub config: PathBuf,

    /// Context to use instead of `current_context`
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Logon timeout (e.g. 500ms, 5s, 2m; bare numbers are seconds)
    #[arg(long, global = true, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Trace every FIX frame
    #[arg(long, global = true)]
    pub engine_logging: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Market data requests
    #[command(name = "marketdata", subcommand)]
    MarketData(marketdata::MarketDataCommands),
    /// Security list requests
    #[command(name = "securitylist", subcommand)]
    SecurityList(securitylist::SecurityListCommands),
    /// Order entry
    #[command(subcommand)]
    Order(order::OrderCommands),
    /// Print the accepted values of an option domain
    Complete(complete::CompleteArgs),
}

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns the command's `FixClientError`.
pub async fn execute(cli: Cli, shutdown: CancellationToken) -> Result<(), FixClientError> {
    match cli.command {
        Commands::MarketData(cmd) => marketdata::execute(&cli.globals, cmd, shutdown).await,
        Commands::SecurityList(cmd) => securitylist::execute(&cli.globals, cmd, shutdown).await,
        Commands::Order(cmd) => order::execute(&cli.globals, cmd, shutdown).await,
        Commands::Complete(args) => {
            complete::execute(&args);
            Ok(())
        }
    }
}

/// Load configuration, resolve the context and run `intent` over a TCP
/// session.
///
/// # Errors
///
/// Configuration, connectivity, build and send failures.
pub async fn run_intent(
    globals: &GlobalArgs,
    intent: Intent,
    shutdown: CancellationToken,
) -> Result<Outcome, FixClientError> {
    let config = load_config(&globals.config)?;
    let context = resolve_context(&config, globals.context.as_deref(), config_dir(&globals.config))?;

    tracing::info!(
        kind = intent.kind(),
        request_id = intent.request_id(),
        "Request validated"
    );

    let mut orchestrator = Orchestrator::new(
        Arc::new(SocketEngine::new()),
        Arc::new(display::StdoutSink::new()),
        shutdown,
        globals.timeout,
        globals.engine_logging,
    );
    let outcome = orchestrator.run(&context, &intent).await?;
    tracing::info!(?outcome, "Run finished");
    Ok(outcome)
}

fn config_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Parse `500ms`, `5s`, `2m` or a bare number of seconds.
///
/// # Errors
///
/// Returns a message suitable for clap when the input is malformed.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration `{input}`"))?;
    match unit {
        "" | "s" => Ok(Duration::from_secs(value)),
        "ms" => Ok(Duration::from_millis(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        _ => Err(format!("invalid duration unit `{unit}` (use ms, s or m)")),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use test_case::test_case;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test_case("500ms", Duration::from_millis(500))]
    #[test_case("5s", Duration::from_secs(5))]
    #[test_case("2m", Duration::from_secs(120))]
    #[test_case("7", Duration::from_secs(7))]
    #[test_case(" 3s ", Duration::from_secs(3))]
    fn durations_parse(input: &str, expected: Duration) {
        assert_eq!(parse_duration(input), Ok(expected));
    }

    #[test_case("")]
    #[test_case("s")]
    #[test_case("5h")]
    #[test_case("-1s")]
    #[test_case("1.5s")]
    fn bad_durations_are_rejected(input: &str) {
        assert!(parse_duration(input).is_err());
    }

    #[test]
    fn globals_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fix",
            "marketdata",
            "request",
            "--symbol",
            "EUR/USD",
            "--timeout",
            "250ms",
            "--context",
            "uat",
            "--config",
            "conf/fix.yaml",
            "--engine-logging",
        ])
        .unwrap();
        assert_eq!(cli.globals.timeout, Some(Duration::from_millis(250)));
        assert_eq!(cli.globals.context.as_deref(), Some("uat"));
        assert_eq!(cli.globals.config, PathBuf::from("conf/fix.yaml"));
        assert!(cli.globals.engine_logging);
    }

    #[test]
    fn config_dir_defaults_to_cwd() {
        assert_eq!(config_dir(Path::new("fix.yaml")), Path::new("."));
        assert_eq!(config_dir(Path::new("conf/fix.yaml")), Path::new("conf"));
    }

    #[tokio::test]
    async fn invalid_arguments_fail_before_reading_config() {
        let cli = Cli::try_parse_from([
            "fix",
            "--config",
            "/nonexistent/fix.yaml",
            "marketdata",
            "request",
            "--symbol",
            "EUR/USD",
            "--type",
            "nonsense",
        ])
        .unwrap();
        let err = execute(cli, CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FixClientError::Validation(_)));
        assert_eq!(err.exit_code(), 64);
    }

    #[tokio::test]
    async fn missing_config_is_a_configuration_error() {
        let cli = Cli::try_parse_from([
            "fix",
            "--config",
            "/nonexistent/fix.yaml",
            "marketdata",
            "request",
            "--symbol",
            "EUR/USD",
        ])
        .unwrap();
        let err = execute(cli, CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FixClientError::Config(_)));
        assert_eq!(err.exit_code(), 78);
    }
}
