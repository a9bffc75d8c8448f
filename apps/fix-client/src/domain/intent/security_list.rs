//! SecurityListRequest intent.

use super::{ResponseMatch, ValidationError, expect_domain, resolve_request_id};
use crate::domain::dict::{Code, Domain};
use crate::domain::message::{Message, tags, tags::msg_type};

/// Raw security list request parameters, before validation.
#[derive(Debug, Clone)]
pub struct SecurityListParams {
    /// SecurityReqID; generated when `None` or blank.
    pub request_id: Option<String>,
    /// SecurityListRequestType.
    pub list_request_type: Code,
    /// Optional SubscriptionRequestType.
    pub subscription_type: Option<Code>,
    /// Symbol, required for the `SYMBOL` request type.
    pub symbol: Option<String>,
}

/// A validated security list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityListIntent {
    request_id: String,
    list_request_type: Code,
    subscription_type: Option<Code>,
    symbol: Option<String>,
}

impl SecurityListIntent {
    /// Validate parameters into an intent.
    ///
    /// # Errors
    ///
    /// Fails when the `SYMBOL` request type has no symbol, or a code comes
    /// from the wrong domain.
    pub fn new(params: SecurityListParams) -> Result<Self, ValidationError> {
        let list_request_type = expect_domain(
            params.list_request_type,
            Domain::SecurityListRequestType,
            "type",
        )?;
        let subscription_type = params
            .subscription_type
            .map(|c| expect_domain(c, Domain::SubscriptionRequestType, "sub-type"))
            .transpose()?;
        let symbol = params
            .symbol
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if list_request_type.token() == "SYMBOL" && symbol.is_none() {
            return Err(ValidationError::MissingField("symbol"));
        }

        Ok(Self {
            request_id: resolve_request_id(params.request_id),
            list_request_type,
            subscription_type,
            symbol,
        })
    }

    /// SecurityReqID.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// SecurityListRequestType.
    #[must_use]
    pub const fn list_request_type(&self) -> Code {
        self.list_request_type
    }

    /// SubscriptionRequestType, if given.
    #[must_use]
    pub const fn subscription_type(&self) -> Option<Code> {
        self.subscription_type
    }

    /// Symbol, if given.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    fn is_subscription(&self) -> bool {
        self.subscription_type
            .is_some_and(|c| c.token() == "SNAPSHOT_AND_UPDATES")
    }

    pub(super) fn classify(&self, msg: &Message) -> ResponseMatch {
        if msg.msg_type() != msg_type::SECURITY_LIST
            || msg.get(tags::SECURITY_REQ_ID) != Some(self.request_id.as_str())
        {
            return ResponseMatch::Unrelated;
        }
        // Absent LastFragment means the list fits in one message.
        let last = msg.get(tags::LAST_FRAGMENT).is_none_or(|v| v == "Y");
        if last && !self.is_subscription() {
            ResponseMatch::Complete
        } else {
            ResponseMatch::Related
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dict::resolve;

    fn params(list_type: &str, symbol: Option<&str>) -> SecurityListParams {
        SecurityListParams {
            request_id: Some("sl-1".to_string()),
            list_request_type: resolve(Domain::SecurityListRequestType, list_type).unwrap(),
            subscription_type: None,
            symbol: symbol.map(str::to_string),
        }
    }

    fn fragment(last: Option<&str>) -> Message {
        let mut msg = Message::new(msg_type::SECURITY_LIST);
        msg.body.set(tags::SECURITY_REQ_ID, "sl-1");
        if let Some(flag) = last {
            msg.body.set(tags::LAST_FRAGMENT, flag);
        }
        msg
    }

    #[test]
    fn symbol_type_requires_symbol() {
        assert_eq!(
            SecurityListIntent::new(params("symbol", None)),
            Err(ValidationError::MissingField("symbol"))
        );
        assert_eq!(
            SecurityListIntent::new(params("symbol", Some("  "))),
            Err(ValidationError::MissingField("symbol"))
        );
        let intent = SecurityListIntent::new(params("symbol", Some("EUR/USD"))).unwrap();
        assert_eq!(intent.symbol(), Some("EUR/USD"));
    }

    #[test]
    fn all_securities_needs_no_symbol() {
        let intent = SecurityListIntent::new(params("all_securities", None)).unwrap();
        assert_eq!(intent.list_request_type().value(), "4");
        assert_eq!(intent.symbol(), None);
    }

    #[test]
    fn completes_on_last_fragment() {
        let intent = SecurityListIntent::new(params("all_securities", None)).unwrap();
        assert_eq!(intent.classify(&fragment(None)), ResponseMatch::Complete);
        assert_eq!(intent.classify(&fragment(Some("Y"))), ResponseMatch::Complete);
        assert_eq!(intent.classify(&fragment(Some("N"))), ResponseMatch::Related);
    }

    #[test]
    fn subscriptions_never_complete() {
        let mut p = params("all_securities", None);
        p.subscription_type = Some(resolve(Domain::SubscriptionRequestType, "snapshot_and_updates").unwrap());
        let intent = SecurityListIntent::new(p).unwrap();
        assert_eq!(intent.classify(&fragment(None)), ResponseMatch::Related);
    }

    #[test]
    fn other_messages_are_unrelated() {
        let intent = SecurityListIntent::new(params("all_securities", None)).unwrap();
        let mut msg = Message::new(msg_type::EXECUTION_REPORT);
        msg.body.set(tags::SECURITY_REQ_ID, "sl-1");
        assert_eq!(intent.classify(&msg), ResponseMatch::Unrelated);
    }
}
