//! Order entry commands

use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::{GlobalArgs, run_intent};
use crate::domain::dict::{Domain, resolve};
use crate::domain::intent::{Intent, NewOrderIntent, NewOrderParams, Party, ValidationError};
use crate::error::FixClientError;

/// Order subcommands
#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// Send a NewOrderSingle after logging on
    New(NewArgs),
}

/// Arguments for `order new`
#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Symbol
    #[arg(long)]
    pub symbol: String,

    /// Side: buy, sell...
    #[arg(long)]
    pub side: String,

    /// Order type: market, limit...
    #[arg(long = "type")]
    pub ord_type: String,

    /// Quantity
    #[arg(long)]
    pub quantity: String,

    /// Limit price
    #[arg(long)]
    pub price: Option<String>,

    /// Time in force
    #[arg(long, default_value = "day")]
    pub time_in_force: String,

    /// Expiry date (YYYY-MM-DD), required for good_till_date
    #[arg(long)]
    pub expiry: Option<String>,

    /// ClOrdID (UUID generated if not given)
    #[arg(long)]
    pub id: Option<String>,

    /// PartyID (repeatable, paired with source and role)
    #[arg(long = "party-id")]
    pub party_ids: Vec<String>,

    /// PartyIDSource (repeatable)
    #[arg(long = "party-id-source")]
    pub party_id_sources: Vec<String>,

    /// PartyRole (repeatable)
    #[arg(long = "party-role")]
    pub party_roles: Vec<String>,

    /// OrderOrigination
    #[arg(long)]
    pub origination: Option<String>,
}

/// Turn arguments into an order intent.
///
/// # Errors
///
/// Unknown tokens, malformed numbers or dates, and the order rules
/// (positive quantity, price for limit orders, expiry for GTD, matching
/// party list lengths).
pub fn validate(args: &NewArgs) -> Result<Intent, ValidationError> {
    let sources = args
        .party_id_sources
        .iter()
        .map(|s| resolve(Domain::PartyIdSource, s))
        .collect::<Result<Vec<_>, _>>()?;
    let roles = args
        .party_roles
        .iter()
        .map(|r| resolve(Domain::PartyRole, r))
        .collect::<Result<Vec<_>, _>>()?;

    let intent = NewOrderIntent::new(NewOrderParams {
        cl_ord_id: args.id.clone(),
        symbol: args.symbol.clone(),
        side: resolve(Domain::OrderSide, &args.side)?,
        ord_type: resolve(Domain::OrderType, &args.ord_type)?,
        time_in_force: resolve(Domain::TimeInForce, &args.time_in_force)?,
        quantity: parse_decimal("quantity", &args.quantity)?,
        price: args
            .price
            .as_deref()
            .map(|p| parse_decimal("price", p))
            .transpose()?,
        expire_date: args.expiry.as_deref().map(parse_date).transpose()?,
        parties: Party::zip(args.party_ids.clone(), sources, roles)?,
        origination: args
            .origination
            .as_deref()
            .map(|o| resolve(Domain::OrderOrigination, o))
            .transpose()?,
    })?;
    Ok(intent.into())
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ValidationError> {
    Decimal::from_str(value.trim()).map_err(|e| ValidationError::InvalidValue {
        field,
        message: format!("`{value}` is not a number: {e}"),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidValue {
            field: "expiry",
            message: format!("`{value}` is not a YYYY-MM-DD date: {e}"),
        }
    })
}

/// Execute order commands
///
/// # Errors
///
/// Validation, configuration, connectivity or send failures.
pub async fn execute(
    globals: &GlobalArgs,
    cmd: OrderCommands,
    shutdown: CancellationToken,
) -> Result<(), FixClientError> {
    match cmd {
        OrderCommands::New(args) => {
            let intent = validate(&args)?;
            run_intent(globals, intent, shutdown).await?;
            Ok(())
        }
    }
}
