//! Market data commands

use clap::{Args, Subcommand};
use tokio_util::sync::CancellationToken;

use super::{GlobalArgs, run_intent};
use crate::domain::dict::{Domain, resolve};
use crate::domain::intent::{Intent, MarketDataIntent, MarketDataParams, ValidationError};
use crate::error::FixClientError;

/// Market data subcommands
#[derive(Subcommand, Debug)]
pub enum MarketDataCommands {
    /// Send a MarketDataRequest after logging on
    Request(RequestArgs),
}

/// Arguments for `marketdata request`
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Symbol to request (repeatable)
    #[arg(long = "symbol")]
    pub symbols: Vec<String>,

    /// Entry type: bid, offer, trade... (repeatable)
    #[arg(long = "type", default_values = ["bid", "offer"])]
    pub types: Vec<String>,

    /// Subscription request type
    #[arg(long, default_value = "snapshot")]
    pub sub_type: String,

    /// MDReqID (UUID generated if not given)
    #[arg(long)]
    pub id: Option<String>,

    /// MarketDepth (0 = full book)
    #[arg(long, default_value_t = 0)]
    pub depth: u32,

    /// Ask for full refresh updates (default)
    #[arg(long, overrides_with = "no_full")]
    pub full: bool,

    /// Ask for incremental refresh updates
    #[arg(long, overrides_with = "full")]
    pub no_full: bool,
}

impl RequestArgs {
    /// Reconciled `--full`/`--no-full`: the last one given wins.
    #[must_use]
    pub const fn full_refresh(&self) -> bool {
        !self.no_full
    }
}

/// Turn arguments into a market data intent.
///
/// # Errors
///
/// Unknown tokens, no symbol or no entry type.
pub fn validate(args: &RequestArgs) -> Result<Intent, ValidationError> {
    let entry_types = args
        .types
        .iter()
        .map(|t| resolve(Domain::MdEntryType, t))
        .collect::<Result<Vec<_>, _>>()?;

    let intent = MarketDataIntent::new(MarketDataParams {
        request_id: args.id.clone(),
        subscription_type: resolve(Domain::SubscriptionRequestType, &args.sub_type)?,
        full_refresh: args.full_refresh(),
        market_depth: args.depth,
        entry_types,
        symbols: args.symbols.clone(),
    })?;
    Ok(intent.into())
}

/// Execute market data commands
///
/// # Errors
///
/// Validation, configuration, connectivity or send failures.
pub async fn execute(
    globals: &GlobalArgs,
    cmd: MarketDataCommands,
    shutdown: CancellationToken,
) -> Result<(), FixClientError> {
    match cmd {
        MarketDataCommands::Request(args) => {
            let intent = validate(&args)?;
            run_intent(globals, intent, shutdown).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use test_case::test_case;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RequestArgs,
    }

    fn parse(argv: &[&str]) -> RequestArgs {
        let mut full = vec!["request"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    fn market_data(intent: Intent) -> MarketDataIntent {
        match intent {
            Intent::MarketData(i) => i,
            other => panic!("expected market data intent, got {other:?}"),
        }
    }

    #[test]
    fn defaults_follow_the_usual_snapshot_request() {
        let args = parse(&["--symbol", "EUR/USD"]);
        assert_eq!(args.types, ["bid", "offer"]);
        assert_eq!(args.sub_type, "snapshot");
        assert_eq!(args.depth, 0);
        assert!(args.full_refresh());

        let intent = market_data(validate(&args).unwrap());
        assert!(intent.is_snapshot());
        let tokens: Vec<_> = intent.entry_types().iter().map(|c| c.token()).collect();
        assert_eq!(tokens, ["BID", "OFFER"]);
        assert_eq!(intent.symbols(), ["EUR/USD"]);
        assert!(!intent.request_id().is_empty());
    }

    #[test_case(&[], true; "default")]
    #[test_case(&["--full"], true; "full")]
    #[test_case(&["--no-full"], false; "no full")]
    #[test_case(&["--full", "--no-full"], false; "no full last")]
    #[test_case(&["--no-full", "--full"], true; "full last")]
    fn full_flags_last_one_wins(flags: &[&str], expected: bool) {
        let mut argv = vec!["--symbol", "EUR/USD"];
        argv.extend_from_slice(flags);
        assert_eq!(parse(&argv).full_refresh(), expected);
    }

    #[test]
    fn repeated_flags_keep_caller_order() {
        let args = parse(&[
            "--symbol", "GBP/USD", "--symbol", "EUR/USD", "--type", "trade", "--type", "bid",
        ]);
        let intent = market_data(validate(&args).unwrap());
        assert_eq!(intent.symbols(), ["GBP/USD", "EUR/USD"]);
        let tokens: Vec<_> = intent.entry_types().iter().map(|c| c.token()).collect();
        assert_eq!(tokens, ["TRADE", "BID"]);
    }

    #[test]
    fn missing_symbol_is_rejected() {
        let err = validate(&parse(&[])).unwrap_err();
        assert_eq!(err, ValidationError::EmptyList("symbol"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = validate(&parse(&["--symbol", "EUR/USD", "--type", "ask"])).unwrap_err();
        assert!(err.to_string().contains("`ask`"));
    }

    #[test]
    fn unknown_subscription_type_is_rejected() {
        let args = parse(&["--symbol", "EUR/USD", "--sub-type", "forever"]);
        assert!(matches!(
            validate(&args),
            Err(ValidationError::UnknownEnumValue(_))
        ));
    }

    #[test]
    fn explicit_id_is_kept() {
        let args = parse(&["--symbol", "EUR/USD", "--id", "md-42"]);
        assert_eq!(validate(&args).unwrap().request_id(), "md-42");
    }
}
