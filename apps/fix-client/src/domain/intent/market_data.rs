//! MarketDataRequest intent.

use super::{ResponseMatch, ValidationError, clean_symbols, expect_domain, resolve_request_id};
use crate::domain::dict::{Code, Domain};
use crate::domain::message::{Message, tags, tags::msg_type};

/// Raw market data request parameters, before validation.
#[derive(Debug, Clone)]
pub struct MarketDataParams {
    /// MDReqID; generated when `None` or blank.
    pub request_id: Option<String>,
    /// SubscriptionRequestType.
    pub subscription_type: Code,
    /// Full refresh (`true`) or incremental updates.
    pub full_refresh: bool,
    /// MarketDepth; 0 is full book.
    pub market_depth: u32,
    /// MDEntryType values, in caller order.
    pub entry_types: Vec<Code>,
    /// Symbols, in caller order.
    pub symbols: Vec<String>,
}

/// A validated market data request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDataIntent {
    request_id: String,
    subscription_type: Code,
    full_refresh: bool,
    market_depth: u32,
    entry_types: Vec<Code>,
    symbols: Vec<String>,
}

impl MarketDataIntent {
    /// Validate parameters into an intent.
    ///
    /// # Errors
    ///
    /// Fails when either list is empty, a symbol is blank, or a code comes
    /// from the wrong domain.
    pub fn new(params: MarketDataParams) -> Result<Self, ValidationError> {
        let subscription_type = expect_domain(
            params.subscription_type,
            Domain::SubscriptionRequestType,
            "sub-type",
        )?;
        if params.entry_types.is_empty() {
            return Err(ValidationError::EmptyList("type"));
        }
        let entry_types = params
            .entry_types
            .into_iter()
            .map(|c| expect_domain(c, Domain::MdEntryType, "type"))
            .collect::<Result<Vec<_>, _>>()?;
        let symbols = clean_symbols(params.symbols, "symbol")?;

        Ok(Self {
            request_id: resolve_request_id(params.request_id),
            subscription_type,
            full_refresh: params.full_refresh,
            market_depth: params.market_depth,
            entry_types,
            symbols,
        })
    }

    /// MDReqID.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// SubscriptionRequestType.
    #[must_use]
    pub const fn subscription_type(&self) -> Code {
        self.subscription_type
    }

    /// Whether a full refresh was requested.
    #[must_use]
    pub const fn full_refresh(&self) -> bool {
        self.full_refresh
    }

    /// MarketDepth.
    #[must_use]
    pub const fn market_depth(&self) -> u32 {
        self.market_depth
    }

    /// MDEntryType codes in caller order.
    #[must_use]
    pub fn entry_types(&self) -> &[Code] {
        &self.entry_types
    }

    /// Symbols in caller order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Whether the request is a one-shot snapshot.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.subscription_type.token() == "SNAPSHOT"
    }

    pub(super) fn classify(&self, msg: &Message) -> ResponseMatch {
        if msg.get(tags::MD_REQ_ID) != Some(self.request_id.as_str()) {
            return ResponseMatch::Unrelated;
        }
        match msg.msg_type() {
            msg_type::MARKET_DATA_REQUEST_REJECT => ResponseMatch::Complete,
            msg_type::MARKET_DATA_SNAPSHOT if self.is_snapshot() => ResponseMatch::Complete,
            _ => ResponseMatch::Related,
        }
    }
}
