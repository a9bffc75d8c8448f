//! Dictionary Resolver
//!
//! Maps human-readable enum tokens (order side, entry type, subscription
//! type, ...) to FIX codes and back.
//!
//! Lookups are case-insensitive on the token side only: `"bid"`, `"Bid"`
//! and `"BID"` all resolve to the `MDEntryType` code `0`, while codes are
//! matched exactly. Every code has exactly one canonical token, so
//! [`reverse`] is total for any [`Code`] obtained from [`resolve`].

mod tables;

use std::fmt;

use tables::Entry;

/// An enumeration domain with its own token table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Side (54).
    OrderSide,
    /// OrdType (40).
    OrderType,
    /// TimeInForce (59).
    TimeInForce,
    /// PartyIDSource (447).
    PartyIdSource,
    /// PartyRole (452).
    PartyRole,
    /// OrderOrigination (1724).
    OrderOrigination,
    /// MDEntryType (269).
    MdEntryType,
    /// SubscriptionRequestType (263).
    SubscriptionRequestType,
    /// SecurityListRequestType (559).
    SecurityListRequestType,
    /// MDUpdateType (265).
    MdUpdateType,
}

impl Domain {
    /// Every domain, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::OrderSide,
        Self::OrderType,
        Self::TimeInForce,
        Self::PartyIdSource,
        Self::PartyRole,
        Self::OrderOrigination,
        Self::MdEntryType,
        Self::SubscriptionRequestType,
        Self::SecurityListRequestType,
        Self::MdUpdateType,
    ];

    /// Kebab-case name used on the command line (`fix complete <name>`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OrderSide => "order-side",
            Self::OrderType => "order-type",
            Self::TimeInForce => "time-in-force",
            Self::PartyIdSource => "party-id-source",
            Self::PartyRole => "party-role",
            Self::OrderOrigination => "order-origination",
            Self::MdEntryType => "md-entry-type",
            Self::SubscriptionRequestType => "subscription-request-type",
            Self::SecurityListRequestType => "security-list-request-type",
            Self::MdUpdateType => "md-update-type",
        }
    }

    /// Parse a domain from its command-line name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    const fn table(self) -> &'static [Entry] {
        match self {
            Self::OrderSide => tables::ORDER_SIDES,
            Self::OrderType => tables::ORDER_TYPES,
            Self::TimeInForce => tables::TIME_IN_FORCES,
            Self::PartyIdSource => tables::PARTY_ID_SOURCES,
            Self::PartyRole => tables::PARTY_ROLES,
            Self::OrderOrigination => tables::ORDER_ORIGINATIONS,
            Self::MdEntryType => tables::MD_ENTRY_TYPES,
            Self::SubscriptionRequestType => tables::SUBSCRIPTION_REQUEST_TYPES,
            Self::SecurityListRequestType => tables::SECURITY_LIST_REQUEST_TYPES,
            Self::MdUpdateType => tables::MD_UPDATE_TYPES,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved protocol code.
///
/// Only obtainable from a dictionary table, which is what makes
/// [`reverse`] total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    domain: Domain,
    entry: &'static Entry,
}

impl Code {
    /// The domain this code belongs to.
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// The FIX wire value (e.g. `"0"` for `BID`).
    #[must_use]
    pub const fn value(&self) -> &'static str {
        self.entry.1
    }

    /// The canonical upper-case token (e.g. `"BID"`).
    #[must_use]
    pub const fn token(&self) -> &'static str {
        self.entry.0
    }

    /// Find the code for a raw wire value.
    #[must_use]
    pub fn from_value(domain: Domain, value: &str) -> Option<Self> {
        domain
            .table()
            .iter()
            .find(|(_, code)| *code == value)
            .map(|entry| Self { domain, entry })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A token that is not part of a domain's table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {domain} value `{token}`")]
pub struct UnknownEnumValue {
    /// Domain that was searched.
    pub domain: Domain,
    /// Token as the caller supplied it.
    pub token: String,
}

/// Resolve a token to its code, ignoring case.
///
/// # Errors
///
/// Returns [`UnknownEnumValue`] when the upper-cased token is not in the
/// domain's table.
pub fn resolve(domain: Domain, token: &str) -> Result<Code, UnknownEnumValue> {
    let wanted = token.to_uppercase();
    domain
        .table()
        .iter()
        .find(|(canonical, _)| *canonical == wanted)
        .map(|entry| Code { domain, entry })
        .ok_or_else(|| UnknownEnumValue {
            domain,
            token: token.to_string(),
        })
}

/// Canonical token of a resolved code.
#[must_use]
pub const fn reverse(code: Code) -> &'static str {
    code.token()
}

/// Canonical token for a raw wire value, if the domain knows it.
///
/// Used to render codes found in inbound messages.
#[must_use]
pub fn lookup(domain: Domain, value: &str) -> Option<&'static str> {
    Code::from_value(domain, value).map(|c| c.token())
}

/// Lower-cased canonical tokens of a domain, sorted, for completion and
/// help output.
#[must_use]
pub fn pretty_values(domain: Domain) -> Vec<String> {
    let mut values: Vec<String> = domain
        .table()
        .iter()
        .map(|(token, _)| token.to_lowercase())
        .collect();
    values.sort();
    values
}
