//! Message Builder
//!
//! Turns a validated intent into an outbound message for one session.
//!
//! Field layouts are version specific, so the supported
//! `(BeginString, DefaultApplVerID)` pairs are listed explicitly in
//! [`LAYOUTS`]. A pair that is not in the table is rejected before any
//! field is written; nothing is inferred from version strings.
//!
//! The builder never sends. It returns a fresh [`Message`] that the caller
//! hands to the initiator.

use chrono::Utc;

use crate::domain::intent::{Intent, MarketDataIntent, NewOrderIntent, SecurityListIntent};
use crate::domain::message::{FieldMap, Message, local_mkt_date, tags, utc_timestamp};
use crate::domain::session::SessionDefinition;

/// Builder failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The session's version pair has no layout.
    #[error("unsupported protocol version: BeginString={begin_string} DefaultApplVerID={appl_ver_id}")]
    UnsupportedProtocolVersion {
        /// Session BeginString.
        begin_string: String,
        /// Session DefaultApplVerID.
        appl_ver_id: String,
    },
}

type BodyLayout<I> = fn(&I, &mut FieldMap);

/// Body layouts for one version pair.
struct VersionLayout {
    begin_string: &'static str,
    appl_ver_id: &'static str,
    market_data_request: BodyLayout<MarketDataIntent>,
    security_list_request: BodyLayout<SecurityListIntent>,
    new_order_single: BodyLayout<NewOrderIntent>,
}

/// Every supported version pair.
const LAYOUTS: &[VersionLayout] = &[
    VersionLayout {
        begin_string: "FIXT.1.1",
        appl_ver_id: "FIX.5.0SP2",
        market_data_request: market_data_request,
        security_list_request: security_list_request,
        new_order_single: new_order_single_50sp2,
    },
    VersionLayout {
        begin_string: "FIX.4.4",
        appl_ver_id: "",
        market_data_request: market_data_request,
        security_list_request: security_list_request,
        new_order_single: new_order_single_44,
    },
];

/// Version pairs accepted by [`build`].
pub fn supported_versions() -> impl Iterator<Item = (&'static str, &'static str)> {
    LAYOUTS.iter().map(|l| (l.begin_string, l.appl_ver_id))
}

/// Build the outbound message for `intent` on `session`.
///
/// # Errors
///
/// Returns [`BuildError::UnsupportedProtocolVersion`] when the session's
/// version pair is not in the layout table.
pub fn build(intent: &Intent, session: &SessionDefinition) -> Result<Message, BuildError> {
    let (begin_string, appl_ver_id) = session.version_pair();
    let layout = LAYOUTS
        .iter()
        .find(|l| l.begin_string == begin_string && l.appl_ver_id == appl_ver_id)
        .ok_or_else(|| BuildError::UnsupportedProtocolVersion {
            begin_string: begin_string.to_string(),
            appl_ver_id: appl_ver_id.to_string(),
        })?;

    let mut msg = Message::new(intent.msg_type());
    msg.header.set(tags::BEGIN_STRING, begin_string);
    set_routing(&mut msg.header, session);

    match intent {
        Intent::MarketData(i) => (layout.market_data_request)(i, &mut msg.body),
        Intent::SecurityList(i) => (layout.security_list_request)(i, &mut msg.body),
        Intent::NewOrder(i) => (layout.new_order_single)(i, &mut msg.body),
    }

    tracing::debug!(
        msg_type = intent.msg_type(),
        request_id = intent.request_id(),
        begin_string,
        appl_ver_id,
        "Built outbound message"
    );

    Ok(msg)
}

/// Copy routing identifiers that are set on the session.
fn set_routing(header: &mut FieldMap, session: &SessionDefinition) {
    for (tag, value) in [
        (tags::SENDER_COMP_ID, &session.sender_comp_id),
        (tags::SENDER_SUB_ID, &session.sender_sub_id),
        (tags::TARGET_COMP_ID, &session.target_comp_id),
        (tags::TARGET_SUB_ID, &session.target_sub_id),
    ] {
        if !value.is_empty() {
            header.set(tag, value.as_str());
        }
    }
}

/// One group entry per element, caller order kept.
fn group_of<T>(items: &[T], mut fill: impl FnMut(&T, &mut FieldMap)) -> Vec<FieldMap> {
    items
        .iter()
        .map(|item| {
            let mut entry = FieldMap::new();
            fill(item, &mut entry);
            entry
        })
        .collect()
}

fn market_data_request(intent: &MarketDataIntent, body: &mut FieldMap) {
    let update_type = if intent.full_refresh() { "0" } else { "1" };

    body.set(tags::MD_REQ_ID, intent.request_id())
        .set(
            tags::SUBSCRIPTION_REQUEST_TYPE,
            intent.subscription_type().value(),
        )
        .set(tags::MARKET_DEPTH, intent.market_depth().to_string())
        .set(tags::MD_UPDATE_TYPE, update_type)
        .set_group(
            tags::NO_MD_ENTRY_TYPES,
            group_of(intent.entry_types(), |code, e| {
                e.set(tags::MD_ENTRY_TYPE, code.value());
            }),
        )
        .set_group(
            tags::NO_RELATED_SYM,
            group_of(intent.symbols(), |symbol, e| {
                e.set(tags::SYMBOL, symbol.as_str());
            }),
        );
}

fn security_list_request(intent: &SecurityListIntent, body: &mut FieldMap) {
    body.set(tags::SECURITY_REQ_ID, intent.request_id()).set(
        tags::SECURITY_LIST_REQUEST_TYPE,
        intent.list_request_type().value(),
    );
    if let Some(sub) = intent.subscription_type() {
        body.set(tags::SUBSCRIPTION_REQUEST_TYPE, sub.value());
    }
    if let Some(symbol) = intent.symbol() {
        body.set(tags::SYMBOL, symbol);
    }
}

fn new_order_single_common(intent: &NewOrderIntent, body: &mut FieldMap) {
    body.set(tags::CL_ORD_ID, intent.cl_ord_id());
    if !intent.parties().is_empty() {
        body.set_group(
            tags::NO_PARTY_IDS,
            group_of(intent.parties(), |party, e| {
                e.set(tags::PARTY_ID, party.id.as_str())
                    .set(tags::PARTY_ID_SOURCE, party.source.value())
                    .set(tags::PARTY_ROLE, party.role.value());
            }),
        );
    }
    body.set(tags::SYMBOL, intent.symbol())
        .set(tags::SIDE, intent.side().value())
        .set(tags::TRANSACT_TIME, utc_timestamp(Utc::now()))
        .set(tags::ORDER_QTY, intent.quantity().normalize().to_string())
        .set(tags::ORD_TYPE, intent.ord_type().value());
    if let Some(price) = intent.price() {
        body.set(tags::PRICE, price.normalize().to_string());
    }
    body.set(tags::TIME_IN_FORCE, intent.time_in_force().value());
    if let Some(date) = intent.expire_date() {
        body.set(tags::EXPIRE_DATE, local_mkt_date(date));
    }
}

fn new_order_single_50sp2(intent: &NewOrderIntent, body: &mut FieldMap) {
    new_order_single_common(intent, body);
    if let Some(origination) = intent.origination() {
        body.set(tags::ORDER_ORIGINATION, origination.value());
    }
}

fn new_order_single_44(intent: &NewOrderIntent, body: &mut FieldMap) {
    new_order_single_common(intent, body);
    if intent.origination().is_some() {
        tracing::warn!("OrderOrigination is not defined in FIX.4.4, omitting it");
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    use super::*;
    use crate::domain::dict::{Domain, resolve};
    use crate::domain::intent::{MarketDataParams, NewOrderParams, Party, SecurityListParams};

    fn session(begin_string: &str, appl_ver_id: &str) -> SessionDefinition {
        SessionDefinition {
            name: "test".to_string(),
            begin_string: begin_string.to_string(),
            default_appl_ver_id: appl_ver_id.to_string(),
            sender_comp_id: "CLIENT".to_string(),
            target_comp_id: "BROKER".to_string(),
            ..SessionDefinition::default()
        }
    }

    fn fixt() -> SessionDefinition {
        session("FIXT.1.1", "FIX.5.0SP2")
    }

    fn market_data(full_refresh: bool) -> Intent {
        MarketDataIntent::new(MarketDataParams {
            request_id: Some("md-1".to_string()),
            subscription_type: resolve(Domain::SubscriptionRequestType, "snapshot").unwrap(),
            full_refresh,
            market_depth: 0,
            entry_types: vec![
                resolve(Domain::MdEntryType, "bid").unwrap(),
                resolve(Domain::MdEntryType, "offer").unwrap(),
            ],
            symbols: vec!["EUR/USD".to_string()],
        })
        .unwrap()
        .into()
    }

    fn security_list() -> Intent {
        SecurityListIntent::new(SecurityListParams {
            request_id: Some("sl-1".to_string()),
            list_request_type: resolve(Domain::SecurityListRequestType, "symbol").unwrap(),
            subscription_type: None,
            symbol: Some("EUR/USD".to_string()),
        })
        .unwrap()
        .into()
    }

    fn order() -> Intent {
        NewOrderIntent::new(NewOrderParams {
            cl_ord_id: Some("ord-1".to_string()),
            symbol: "AAPL".to_string(),
            side: resolve(Domain::OrderSide, "sell").unwrap(),
            ord_type: resolve(Domain::OrderType, "limit").unwrap(),
            time_in_force: resolve(Domain::TimeInForce, "good_till_date").unwrap(),
            quantity: dec!(100),
            price: Some(dec!(187.50)),
            expire_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            parties: Party::zip(
                vec!["FIRM".to_string()],
                vec![resolve(Domain::PartyIdSource, "proprietary").unwrap()],
                vec![resolve(Domain::PartyRole, "executing_firm").unwrap()],
            )
            .unwrap(),
            origination: Some(
                resolve(Domain::OrderOrigination, "order_received_from_a_customer").unwrap(),
            ),
        })
        .unwrap()
        .into()
    }

    #[test]
    fn snapshot_market_data_request_scenario() {
        let msg = build(&market_data(true), &fixt()).unwrap();

        assert_eq!(msg.msg_type(), "V");
        assert_eq!(msg.begin_string(), Some("FIXT.1.1"));
        assert_eq!(msg.body.get(tags::MD_REQ_ID), Some("md-1"));
        assert_eq!(msg.body.get(tags::SUBSCRIPTION_REQUEST_TYPE), Some("0"));
        assert_eq!(msg.body.get(tags::MARKET_DEPTH), Some("0"));
        assert_eq!(msg.body.get(tags::MD_UPDATE_TYPE), Some("0"));

        let symbols = msg.body.group(tags::NO_RELATED_SYM).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].get(tags::SYMBOL), Some("EUR/USD"));

        let entries = msg.body.group(tags::NO_MD_ENTRY_TYPES).unwrap();
        let codes: Vec<_> = entries
            .iter()
            .filter_map(|e| e.get(tags::MD_ENTRY_TYPE))
            .collect();
        assert_eq!(codes, vec!["0", "1"]);
    }

    #[test]
    fn incremental_refresh_sets_update_type() {
        let msg = build(&market_data(false), &fixt()).unwrap();
        assert_eq!(msg.body.get(tags::MD_UPDATE_TYPE), Some("1"));
    }

    #[test]
    fn routing_fields_are_sparse() {
        let msg = build(&market_data(true), &fixt()).unwrap();
        assert_eq!(msg.header.get(tags::SENDER_COMP_ID), Some("CLIENT"));
        assert_eq!(msg.header.get(tags::TARGET_COMP_ID), Some("BROKER"));
        assert!(!msg.header.contains(tags::SENDER_SUB_ID));
        assert!(!msg.header.contains(tags::TARGET_SUB_ID));

        let mut with_subs = fixt();
        with_subs.sender_sub_id = "DESK".to_string();
        with_subs.target_sub_id = "FX".to_string();
        let msg = build(&market_data(true), &with_subs).unwrap();
        assert_eq!(msg.header.get(tags::SENDER_SUB_ID), Some("DESK"));
        assert_eq!(msg.header.get(tags::TARGET_SUB_ID), Some("FX"));
    }

    #[test_case("FIXT.1.1", "FIX.5.0SP2")]
    #[test_case("FIX.4.4", "")]
    fn every_supported_pair_builds_every_message(begin_string: &str, appl_ver_id: &str) {
        let session = session(begin_string, appl_ver_id);
        for (intent, msg_type) in [(market_data(true), "V"), (security_list(), "x"), (order(), "D")] {
            let msg = build(&intent, &session).unwrap();
            assert_eq!(msg.msg_type(), msg_type);
            assert_eq!(msg.begin_string(), Some(begin_string));
        }
    }

    #[test_case("FIXT.1.1", "FIX.5.0")]
    #[test_case("FIXT.1.1", "")]
    #[test_case("FIX.4.2", "")]
    #[test_case("FIX.4.4", "FIX.5.0SP2")]
    #[test_case("", "")]
    fn unsupported_pairs_fail(begin_string: &str, appl_ver_id: &str) {
        for intent in [market_data(true), security_list(), order()] {
            assert_eq!(
                build(&intent, &session(begin_string, appl_ver_id)),
                Err(BuildError::UnsupportedProtocolVersion {
                    begin_string: begin_string.to_string(),
                    appl_ver_id: appl_ver_id.to_string(),
                })
            );
        }
    }

    #[test]
    fn security_list_request_fields() {
        let msg = build(&security_list(), &fixt()).unwrap();
        assert_eq!(msg.body.get(tags::SECURITY_REQ_ID), Some("sl-1"));
        assert_eq!(msg.body.get(tags::SECURITY_LIST_REQUEST_TYPE), Some("0"));
        assert_eq!(msg.body.get(tags::SYMBOL), Some("EUR/USD"));
        assert!(!msg.body.contains(tags::SUBSCRIPTION_REQUEST_TYPE));
    }

    #[test]
    fn new_order_single_fields() {
        let msg = build(&order(), &fixt()).unwrap();
        assert_eq!(msg.body.get(tags::CL_ORD_ID), Some("ord-1"));
        assert_eq!(msg.body.get(tags::SIDE), Some("2"));
        assert_eq!(msg.body.get(tags::ORD_TYPE), Some("2"));
        assert_eq!(msg.body.get(tags::ORDER_QTY), Some("100"));
        assert_eq!(msg.body.get(tags::PRICE), Some("187.5"));
        assert_eq!(msg.body.get(tags::TIME_IN_FORCE), Some("6"));
        assert_eq!(msg.body.get(tags::EXPIRE_DATE), Some("20261231"));
        assert_eq!(msg.body.get(tags::ORDER_ORIGINATION), Some("1"));
        assert!(msg.body.contains(tags::TRANSACT_TIME));

        let parties = msg.body.group(tags::NO_PARTY_IDS).unwrap();
        assert_eq!(parties.len(), 1);
        assert_eq!(parties[0].get(tags::PARTY_ID), Some("FIRM"));
        assert_eq!(parties[0].get(tags::PARTY_ID_SOURCE), Some("D"));
        assert_eq!(parties[0].get(tags::PARTY_ROLE), Some("1"));
    }

    #[test]
    fn fix44_order_omits_origination() {
        let msg = build(&order(), &session("FIX.4.4", "")).unwrap();
        assert!(!msg.body.contains(tags::ORDER_ORIGINATION));
        assert_eq!(msg.body.get(tags::CL_ORD_ID), Some("ord-1"));
    }

    #[test]
    fn supported_versions_lists_the_table() {
        let pairs: Vec<_> = supported_versions().collect();
        assert_eq!(pairs, vec![("FIXT.1.1", "FIX.5.0SP2"), ("FIX.4.4", "")]);
    }
}
