//! Trading Intents
//!
//! One validated, immutable value per command. An intent is produced from
//! a plain parameter struct by its `new` constructor, which resolves
//! request ids and enforces cross-field rules. Nothing in an intent changes
//! after construction; the message builder only reads it.

mod market_data;
mod new_order;
mod security_list;

pub use market_data::{MarketDataIntent, MarketDataParams};
pub use new_order::{NewOrderIntent, NewOrderParams, Party};
pub use security_list::{SecurityListIntent, SecurityListParams};

use crate::domain::dict::{Code, Domain, UnknownEnumValue};
use crate::domain::message::{Message, tags, tags::msg_type};

/// Rejected command input. Raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Token not found in a dictionary table.
    #[error(transparent)]
    UnknownEnumValue(#[from] UnknownEnumValue),

    /// A required field was not supplied.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required list was empty.
    #[error("at least one {0} is required")]
    EmptyList(&'static str),

    /// A field value is out of range or malformed.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Party id, source and role lists differ in length.
    #[error("party lists differ in length: {ids} ids, {sources} sources, {roles} roles")]
    PartyCountMismatch {
        /// Number of party ids.
        ids: usize,
        /// Number of party id sources.
        sources: usize,
        /// Number of party roles.
        roles: usize,
    },
}

/// How an inbound application message relates to the request that was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMatch {
    /// Not about this request.
    Unrelated,
    /// A response that leaves the request open (incremental update,
    /// intermediate fragment).
    Related,
    /// The terminal response; the streaming loop can finish.
    Complete,
}

/// A validated command intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// MarketDataRequest (V).
    MarketData(MarketDataIntent),
    /// SecurityListRequest (x).
    SecurityList(SecurityListIntent),
    /// NewOrderSingle (D).
    NewOrder(NewOrderIntent),
}

impl Intent {
    /// MsgType of the message this intent produces.
    #[must_use]
    pub const fn msg_type(&self) -> &'static str {
        match self {
            Self::MarketData(_) => msg_type::MARKET_DATA_REQUEST,
            Self::SecurityList(_) => msg_type::SECURITY_LIST_REQUEST,
            Self::NewOrder(_) => msg_type::NEW_ORDER_SINGLE,
        }
    }

    /// Request identifier: MDReqID, SecurityReqID or ClOrdID.
    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::MarketData(i) => i.request_id(),
            Self::SecurityList(i) => i.request_id(),
            Self::NewOrder(i) => i.cl_ord_id(),
        }
    }

    /// Short command name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MarketData(_) => "market_data_request",
            Self::SecurityList(_) => "security_list_request",
            Self::NewOrder(_) => "new_order_single",
        }
    }

    /// Classify an inbound application message against this request.
    ///
    /// `sent_seq` is the MsgSeqNum our request went out with, when known.
    #[must_use]
    pub fn classify(&self, msg: &Message, sent_seq: Option<u64>) -> ResponseMatch {
        if self.is_rejected_by(msg, sent_seq) {
            return ResponseMatch::Complete;
        }
        match self {
            Self::MarketData(i) => i.classify(msg),
            Self::SecurityList(i) => i.classify(msg),
            Self::NewOrder(i) => i.classify(msg),
        }
    }

    /// Session `Reject` naming our message type and, when both sides know
    /// it, our MsgSeqNum; or `BusinessMessageReject` naming our request id.
    fn is_rejected_by(&self, msg: &Message, sent_seq: Option<u64>) -> bool {
        match msg.msg_type() {
            msg_type::REJECT => {
                let ref_seq = msg
                    .get(tags::REF_SEQ_NUM)
                    .and_then(|v| v.parse::<u64>().ok());
                let seq_matches = match (ref_seq, sent_seq) {
                    (Some(referenced), Some(sent)) => referenced == sent,
                    _ => true,
                };
                msg.get(tags::REF_MSG_TYPE) == Some(self.msg_type()) && seq_matches
            }
            msg_type::BUSINESS_MESSAGE_REJECT => {
                msg.get(tags::BUSINESS_REJECT_REF_ID) == Some(self.request_id())
            }
            _ => false,
        }
    }
}

impl From<MarketDataIntent> for Intent {
    fn from(value: MarketDataIntent) -> Self {
        Self::MarketData(value)
    }
}

impl From<SecurityListIntent> for Intent {
    fn from(value: SecurityListIntent) -> Self {
        Self::SecurityList(value)
    }
}

impl From<NewOrderIntent> for Intent {
    fn from(value: NewOrderIntent) -> Self {
        Self::NewOrder(value)
    }
}

/// Use the caller's id, or a fresh UUID v4 when none was given.
fn resolve_request_id(id: Option<String>) -> String {
    id.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Reject a code taken from the wrong dictionary domain.
fn expect_domain(code: Code, domain: Domain, field: &'static str) -> Result<Code, ValidationError> {
    if code.domain() == domain {
        Ok(code)
    } else {
        Err(ValidationError::InvalidValue {
            field,
            message: format!("expected a {domain} value, got {}", code.domain()),
        })
    }
}

/// Trim symbols and reject blanks; an empty list is an error.
fn clean_symbols(symbols: Vec<String>, field: &'static str) -> Result<Vec<String>, ValidationError> {
    if symbols.is_empty() {
        return Err(ValidationError::EmptyList(field));
    }
    symbols
        .into_iter()
        .map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ValidationError::InvalidValue {
                    field,
                    message: "blank value".to_string(),
                })
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dict::resolve;

    fn snapshot_intent() -> Intent {
        MarketDataIntent::new(MarketDataParams {
            request_id: Some("req-1".to_string()),
            subscription_type: resolve(Domain::SubscriptionRequestType, "snapshot").unwrap(),
            full_refresh: true,
            market_depth: 0,
            entry_types: vec![resolve(Domain::MdEntryType, "bid").unwrap()],
            symbols: vec!["EUR/USD".to_string()],
        })
        .unwrap()
        .into()
    }

    #[test]
    fn generated_request_ids_are_unique() {
        let a = resolve_request_id(None);
        let b = resolve_request_id(Some("  ".to_string()));
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
        assert_eq!(resolve_request_id(Some(" abc ".to_string())), "abc");
    }

    #[test]
    fn session_reject_for_our_msg_type_completes() {
        let intent = snapshot_intent();
        let mut reject = Message::new(msg_type::REJECT);
        reject.body.set(tags::REF_MSG_TYPE, "V");
        assert_eq!(intent.classify(&reject, None), ResponseMatch::Complete);
        assert_eq!(intent.classify(&reject, Some(2)), ResponseMatch::Complete);

        reject.body.set(tags::REF_MSG_TYPE, "D");
        assert_eq!(intent.classify(&reject, None), ResponseMatch::Unrelated);
    }

    #[test]
    fn session_reject_of_another_frame_is_unrelated() {
        let intent = snapshot_intent();
        let mut reject = Message::new(msg_type::REJECT);
        reject
            .body
            .set(tags::REF_SEQ_NUM, "7")
            .set(tags::REF_MSG_TYPE, "V");
        assert_eq!(intent.classify(&reject, Some(2)), ResponseMatch::Unrelated);
        assert_eq!(intent.classify(&reject, Some(7)), ResponseMatch::Complete);
        assert_eq!(intent.classify(&reject, None), ResponseMatch::Complete);
    }

    #[test]
    fn business_reject_matches_on_request_id() {
        let intent = snapshot_intent();
        let mut reject = Message::new(msg_type::BUSINESS_MESSAGE_REJECT);
        reject.body.set(tags::BUSINESS_REJECT_REF_ID, "req-1");
        assert_eq!(intent.classify(&reject, Some(2)), ResponseMatch::Complete);

        reject.body.set(tags::BUSINESS_REJECT_REF_ID, "other");
        assert_eq!(intent.classify(&reject, Some(2)), ResponseMatch::Unrelated);
    }

    #[test]
    fn wrong_domain_code_is_rejected() {
        let bid = resolve(Domain::MdEntryType, "bid").unwrap();
        let err = expect_domain(bid, Domain::OrderSide, "side").unwrap_err();
        assert!(err.to_string().contains("expected a order-side value"));
    }

    #[test]
    fn blank_symbols_are_rejected() {
        assert_eq!(
            clean_symbols(vec![], "symbol"),
            Err(ValidationError::EmptyList("symbol"))
        );
        assert!(clean_symbols(vec![" ".to_string()], "symbol").is_err());
        assert_eq!(
            clean_symbols(vec![" EUR/USD ".to_string()], "symbol").unwrap(),
            vec!["EUR/USD".to_string()]
        );
    }
}
