//! Message display
//!
//! Prints inbound application messages to stdout, one per line, as
//! `tag=value` pairs separated by `|`. Enumerated values known to the
//! dictionary carry their token, e.g. `269=0(BID)`.

use std::io::Write;

use crate::application::ports::MessageSink;
use crate::domain::dict::{Domain, lookup};
use crate::domain::message::{FieldMap, FieldValue, Message, tags};

/// Sink writing to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Create a sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MessageSink for StdoutSink {
    fn display(&self, msg: &Message) {
        let line = render(msg);
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!(error = %e, "Failed to write message to stdout");
        }
    }
}

/// Render a message with enum annotations.
#[must_use]
pub fn render(msg: &Message) -> String {
    let mut parts = Vec::new();
    collect(&msg.header, &mut parts);
    collect(&msg.body, &mut parts);
    parts.join("|")
}

fn collect(map: &FieldMap, parts: &mut Vec<String>) {
    for (tag, value) in map.iter() {
        match value {
            FieldValue::Scalar(v) => parts.push(annotate(tag, v)),
            FieldValue::Group(entries) => {
                parts.push(format!("{tag}={}", entries.len()));
                for entry in entries {
                    collect(entry, parts);
                }
            }
        }
    }
}

fn annotate(tag: u32, value: &str) -> String {
    match domain_of(tag).and_then(|d| lookup(d, value)) {
        Some(token) => format!("{tag}={value}({token})"),
        None => format!("{tag}={value}"),
    }
}

const fn domain_of(tag: u32) -> Option<Domain> {
    Some(match tag {
        tags::SIDE => Domain::OrderSide,
        tags::ORD_TYPE => Domain::OrderType,
        tags::TIME_IN_FORCE => Domain::TimeInForce,
        tags::PARTY_ID_SOURCE => Domain::PartyIdSource,
        tags::PARTY_ROLE => Domain::PartyRole,
        tags::ORDER_ORIGINATION => Domain::OrderOrigination,
        tags::MD_ENTRY_TYPE => Domain::MdEntryType,
        tags::SUBSCRIPTION_REQUEST_TYPE => Domain::SubscriptionRequestType,
        tags::SECURITY_LIST_REQUEST_TYPE => Domain::SecurityListRequestType,
        tags::MD_UPDATE_TYPE => Domain::MdUpdateType,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_values_are_annotated() {
        let mut msg = Message::new("W");
        msg.body.push(tags::MD_REQ_ID, "r1");
        msg.body.push(tags::MD_ENTRY_TYPE, "0");
        msg.body.push(tags::MD_ENTRY_TYPE, "1");
        msg.body.push(tags::SYMBOL, "EUR/USD");
        assert_eq!(
            render(&msg),
            "35=W|262=r1|269=0(BID)|269=1(OFFER)|55=EUR/USD"
        );
    }

    #[test]
    fn unknown_codes_are_left_bare() {
        let mut msg = Message::new("8");
        msg.body.push(tags::SIDE, "Z");
        assert_eq!(render(&msg), "35=8|54=Z");
    }

    #[test]
    fn groups_render_count_then_entries() {
        let mut entry = FieldMap::new();
        entry.set(tags::SYMBOL, "EUR/USD");
        let mut msg = Message::new("V");
        msg.body.set_group(tags::NO_RELATED_SYM, vec![entry]);
        assert_eq!(render(&msg), "35=V|146=1|55=EUR/USD");
    }
}
