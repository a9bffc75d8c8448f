//! FIX Client Binary
//!
//! # Usage
//!
//! ```bash
//! fix --context uat marketdata request --symbol EUR/USD
//! fix order new --symbol EUR/USD --side buy --type limit --quantity 10 --price 1.085
//! fix complete order-side
//! ```
//!
//! # Environment Variables
//!
//! - `FIX_CONFIG`: configuration file (default: fix.yaml)
//! - `RUST_LOG`: log filter (default: fix_client=info)
//! - `OTEL_ENABLED`: export spans over OTLP (default: false)
//!
//! Exit codes: 0 success or interrupt, 64 invalid input, 69 connectivity,
//! 74 send failure, 78 configuration.

use std::process::ExitCode;

use clap::Parser;
use fix_client::cli::{self, Cli};
use fix_client::infrastructure::telemetry;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    let cli = Cli::parse();
    let _telemetry_guard = telemetry::init(cli.globals.engine_logging);

    let shutdown = CancellationToken::new();
    let signal_task = tokio::spawn(await_shutdown(shutdown.clone()));

    let result = cli::execute(cli, shutdown).await;
    signal_task.abort();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind().as_str(), "Command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for SIGINT or SIGTERM, then cancel `shutdown`.
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, logging out");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, logging out");
        }
    }

    shutdown.cancel();
}
