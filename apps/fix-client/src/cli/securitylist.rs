//! Security list commands

use clap::{Args, Subcommand};
use tokio_util::sync::CancellationToken;

use super::{GlobalArgs, run_intent};
use crate::domain::dict::{Domain, resolve};
use crate::domain::intent::{Intent, SecurityListIntent, SecurityListParams, ValidationError};
use crate::error::FixClientError;

/// Security list subcommands
#[derive(Subcommand, Debug)]
pub enum SecurityListCommands {
    /// Send a SecurityListRequest after logging on
    Request(RequestArgs),
}

/// Arguments for `securitylist request`
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// SecurityListRequestType
    #[arg(long = "type", default_value = "all_securities")]
    pub list_type: String,

    /// Symbol, required with `--type symbol`
    #[arg(long)]
    pub symbol: Option<String>,

    /// Subscription request type
    #[arg(long)]
    pub sub_type: Option<String>,

    /// SecurityReqID (UUID generated if not given)
    #[arg(long)]
    pub id: Option<String>,
}

/// Turn arguments into a security list intent.
///
/// # Errors
///
/// Unknown tokens, or `--type symbol` without `--symbol`.
pub fn validate(args: &RequestArgs) -> Result<Intent, ValidationError> {
    let subscription_type = args
        .sub_type
        .as_deref()
        .map(|t| resolve(Domain::SubscriptionRequestType, t))
        .transpose()?;

    let intent = SecurityListIntent::new(SecurityListParams {
        request_id: args.id.clone(),
        list_request_type: resolve(Domain::SecurityListRequestType, &args.list_type)?,
        subscription_type,
        symbol: args.symbol.clone(),
    })?;
    Ok(intent.into())
}

/// Execute security list commands
///
/// # Errors
///
/// Validation, configuration, connectivity or send failures.
pub async fn execute(
    globals: &GlobalArgs,
    cmd: SecurityListCommands,
    shutdown: CancellationToken,
) -> Result<(), FixClientError> {
    match cmd {
        SecurityListCommands::Request(args) => {
            let intent = validate(&args)?;
            run_intent(globals, intent, shutdown).await?;
            Ok(())
        }
    }
}
