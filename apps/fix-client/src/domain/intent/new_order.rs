//! NewOrderSingle intent.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{ResponseMatch, ValidationError, expect_domain, resolve_request_id};
use crate::domain::dict::{Code, Domain};
use crate::domain::message::{Message, tags, tags::msg_type};

/// One entry of the Parties group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    /// PartyID.
    pub id: String,
    /// PartyIDSource.
    pub source: Code,
    /// PartyRole.
    pub role: Code,
}

impl Party {
    /// Pair up parallel id/source/role lists.
    ///
    /// # Errors
    ///
    /// Fails when the lists differ in length, an id is blank, or a code
    /// comes from the wrong domain.
    pub fn zip(
        ids: Vec<String>,
        sources: Vec<Code>,
        roles: Vec<Code>,
    ) -> Result<Vec<Self>, ValidationError> {
        if ids.len() != sources.len() || ids.len() != roles.len() {
            return Err(ValidationError::PartyCountMismatch {
                ids: ids.len(),
                sources: sources.len(),
                roles: roles.len(),
            });
        }
        ids.into_iter()
            .zip(sources)
            .zip(roles)
            .map(|((id, source), role)| {
                let id = id.trim().to_string();
                if id.is_empty() {
                    return Err(ValidationError::InvalidValue {
                        field: "party-id",
                        message: "blank value".to_string(),
                    });
                }
                Ok(Self {
                    id,
                    source: expect_domain(source, Domain::PartyIdSource, "party-id-source")?,
                    role: expect_domain(role, Domain::PartyRole, "party-role")?,
                })
            })
            .collect()
    }
}

/// Raw order parameters, before validation.
#[derive(Debug, Clone)]
pub struct NewOrderParams {
    /// ClOrdID; generated when `None` or blank.
    pub cl_ord_id: Option<String>,
    /// Symbol.
    pub symbol: String,
    /// Side.
    pub side: Code,
    /// OrdType.
    pub ord_type: Code,
    /// TimeInForce.
    pub time_in_force: Code,
    /// OrderQty, must be positive.
    pub quantity: Decimal,
    /// Price, required for limit order types.
    pub price: Option<Decimal>,
    /// ExpireDate, required for `GOOD_TILL_DATE`.
    pub expire_date: Option<NaiveDate>,
    /// Parties group entries.
    pub parties: Vec<Party>,
    /// OrderOrigination.
    pub origination: Option<Code>,
}

/// A validated single order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderIntent {
    cl_ord_id: String,
    symbol: String,
    side: Code,
    ord_type: Code,
    time_in_force: Code,
    quantity: Decimal,
    price: Option<Decimal>,
    expire_date: Option<NaiveDate>,
    parties: Vec<Party>,
    origination: Option<Code>,
}

/// Order types that carry a limit price.
const PRICED_ORDER_TYPES: &[&str] = &["LIMIT", "STOP_LIMIT"];

impl NewOrderIntent {
    /// Validate parameters into an intent.
    ///
    /// # Errors
    ///
    /// Fails on a blank symbol, a non-positive quantity or price, a missing
    /// price for limit orders, a missing expiry for `GOOD_TILL_DATE`, or a
    /// code from the wrong domain.
    pub fn new(params: NewOrderParams) -> Result<Self, ValidationError> {
        let symbol = params.symbol.trim().to_string();
        if symbol.is_empty() {
            return Err(ValidationError::MissingField("symbol"));
        }
        let side = expect_domain(params.side, Domain::OrderSide, "side")?;
        let ord_type = expect_domain(params.ord_type, Domain::OrderType, "type")?;
        let time_in_force =
            expect_domain(params.time_in_force, Domain::TimeInForce, "time-in-force")?;
        let origination = params
            .origination
            .map(|c| expect_domain(c, Domain::OrderOrigination, "origination"))
            .transpose()?;

        if params.quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidValue {
                field: "quantity",
                message: format!("must be positive, got {}", params.quantity),
            });
        }
        match params.price {
            Some(price) if price <= Decimal::ZERO => {
                return Err(ValidationError::InvalidValue {
                    field: "price",
                    message: format!("must be positive, got {price}"),
                });
            }
            None if PRICED_ORDER_TYPES.contains(&ord_type.token()) => {
                return Err(ValidationError::MissingField("price"));
            }
            _ => {}
        }
        if time_in_force.token() == "GOOD_TILL_DATE" && params.expire_date.is_none() {
            return Err(ValidationError::MissingField("expiry"));
        }

        Ok(Self {
            cl_ord_id: resolve_request_id(params.cl_ord_id),
            symbol,
            side,
            ord_type,
            time_in_force,
            quantity: params.quantity,
            price: params.price,
            expire_date: params.expire_date,
            parties: params.parties,
            origination,
        })
    }

    /// ClOrdID.
    #[must_use]
    pub fn cl_ord_id(&self) -> &str {
        &self.cl_ord_id
    }

    /// Symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Side.
    #[must_use]
    pub const fn side(&self) -> Code {
        self.side
    }

    /// OrdType.
    #[must_use]
    pub const fn ord_type(&self) -> Code {
        self.ord_type
    }

    /// TimeInForce.
    #[must_use]
    pub const fn time_in_force(&self) -> Code {
        self.time_in_force
    }

    /// OrderQty.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Price, if any.
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// ExpireDate, if any.
    #[must_use]
    pub const fn expire_date(&self) -> Option<NaiveDate> {
        self.expire_date
    }

    /// Parties in caller order.
    #[must_use]
    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    /// OrderOrigination, if any.
    #[must_use]
    pub const fn origination(&self) -> Option<Code> {
        self.origination
    }

    pub(super) fn classify(&self, msg: &Message) -> ResponseMatch {
        let ours = msg.get(tags::CL_ORD_ID) == Some(self.cl_ord_id.as_str());
        match msg.msg_type() {
            msg_type::EXECUTION_REPORT | msg_type::ORDER_CANCEL_REJECT if ours => {
                ResponseMatch::Complete
            }
            _ if ours => ResponseMatch::Related,
            _ => ResponseMatch::Unrelated,
        }
    }
}
