//! FIX Message Model
//!
//! An outbound or inbound FIX message as an ordered header plus an ordered
//! body. Field order is preserved exactly as inserted; the codec emits
//! fields in that order, with repeating groups written as their count tag
//! followed by each entry's fields.
//!
//! Structural framing tags (BodyLength, CheckSum) are never stored. They
//! are computed by the codec when a message is written.

pub mod tags;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// UTCTimestamp format with milliseconds (`YYYYMMDD-HH:MM:SS.sss`).
const UTC_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H:%M:%S%.3f";

/// Format a UTCTimestamp field value.
#[must_use]
pub fn utc_timestamp(at: DateTime<Utc>) -> String {
    at.format(UTC_TIMESTAMP_FORMAT).to_string()
}

/// Format a LocalMktDate field value (`YYYYMMDD`).
#[must_use]
pub fn local_mkt_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// One value in a [`FieldMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain `tag=value` field.
    Scalar(String),
    /// Repeating group keyed by its count tag (e.g. `NoRelatedSym`).
    Group(Vec<FieldMap>),
}

/// Ordered tag/value storage.
///
/// [`FieldMap::set`] overwrites in place, keeping the original position.
/// [`FieldMap::push`] appends unconditionally; the decoder uses it because
/// inbound frames may legitimately repeat tags inside flattened groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(u32, FieldValue)>,
}

impl FieldMap {
    /// Create an empty field map.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set a scalar field, replacing any existing value for `tag`.
    pub fn set(&mut self, tag: u32, value: impl Into<String>) -> &mut Self {
        self.set_value(tag, FieldValue::Scalar(value.into()))
    }

    /// Set a repeating group under its count tag.
    ///
    /// An empty group is still recorded; callers reject empty lists before
    /// building.
    pub fn set_group(&mut self, count_tag: u32, entries: Vec<Self>) -> &mut Self {
        self.set_value(count_tag, FieldValue::Group(entries))
    }

    fn set_value(&mut self, tag: u32, value: FieldValue) -> &mut Self {
        if let Some(slot) = self.fields.iter_mut().find(|(t, _)| *t == tag) {
            slot.1 = value;
        } else {
            self.fields.push((tag, value));
        }
        self
    }

    /// Append a scalar field without replacing earlier occurrences.
    pub fn push(&mut self, tag: u32, value: impl Into<String>) {
        self.fields.push((tag, FieldValue::Scalar(value.into())));
    }

    /// Remove every occurrence of `tag`.
    pub fn remove(&mut self, tag: u32) {
        self.fields.retain(|(t, _)| *t != tag);
    }

    /// First scalar value for `tag`.
    #[must_use]
    pub fn get(&self, tag: u32) -> Option<&str> {
        self.fields.iter().find_map(|(t, v)| match v {
            FieldValue::Scalar(s) if *t == tag => Some(s.as_str()),
            _ => None,
        })
    }

    /// Every scalar value for `tag`, in order.
    pub fn get_all(&self, tag: u32) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(move |(t, v)| match v {
            FieldValue::Scalar(s) if *t == tag => Some(s.as_str()),
            _ => None,
        })
    }

    /// Entries of the group stored under `count_tag`.
    #[must_use]
    pub fn group(&self, count_tag: u32) -> Option<&[Self]> {
        self.fields.iter().find_map(|(t, v)| match v {
            FieldValue::Group(entries) if *t == count_tag => Some(entries.as_slice()),
            _ => None,
        })
    }

    /// Whether `tag` is present, as a scalar or a group.
    #[must_use]
    pub fn contains(&self, tag: u32) -> bool {
        self.fields.iter().any(|(t, _)| *t == tag)
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &FieldValue)> {
        self.fields.iter().map(|(t, v)| (*t, v))
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the map has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn write_pairs(&self, f: &mut fmt::Formatter<'_>, first: &mut bool) -> fmt::Result {
        for (tag, value) in &self.fields {
            match value {
                FieldValue::Scalar(s) => {
                    if !*first {
                        f.write_str("|")?;
                    }
                    *first = false;
                    write!(f, "{tag}={s}")?;
                }
                FieldValue::Group(entries) => {
                    if !*first {
                        f.write_str("|")?;
                    }
                    *first = false;
                    write!(f, "{tag}={}", entries.len())?;
                    for entry in entries {
                        entry.write_pairs(f, first)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// A FIX message: header and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Standard header (BeginString, MsgType, routing and sequencing).
    pub header: FieldMap,
    /// Message body.
    pub body: FieldMap,
}

impl Message {
    /// Create a message of the given type with an otherwise empty header.
    #[must_use]
    pub fn new(msg_type: &str) -> Self {
        let mut header = FieldMap::new();
        header.set(tags::MSG_TYPE, msg_type);
        Self {
            header,
            body: FieldMap::new(),
        }
    }

    /// MsgType (35), empty if absent.
    #[must_use]
    pub fn msg_type(&self) -> &str {
        self.header.get(tags::MSG_TYPE).unwrap_or_default()
    }

    /// BeginString (8), if set.
    #[must_use]
    pub fn begin_string(&self) -> Option<&str> {
        self.header.get(tags::BEGIN_STRING)
    }

    /// MsgSeqNum (34), if present and numeric.
    #[must_use]
    pub fn seq_num(&self) -> Option<u64> {
        self.header.get(tags::MSG_SEQ_NUM)?.parse().ok()
    }

    /// Look a tag up in the header, then the body.
    #[must_use]
    pub fn get(&self, tag: u32) -> Option<&str> {
        self.header.get(tag).or_else(|| self.body.get(tag))
    }

    /// Whether this is a session-level (admin) message.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        tags::msg_type::is_admin(self.msg_type())
    }
}

/// Renders the message as `tag=value` pairs separated by `|`.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        self.header.write_pairs(f, &mut first)?;
        self.body.write_pairs(f, &mut first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut map = FieldMap::new();
        map.set(1, "a").set(2, "b").set(1, "c");
        let order: Vec<u32> = map.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(map.get(1), Some("c"));
    }

    #[test]
    fn push_keeps_duplicates() {
        let mut map = FieldMap::new();
        map.push(55, "EUR/USD");
        map.push(55, "GBP/USD");
        assert_eq!(map.get(55), Some("EUR/USD"));
        assert_eq!(
            map.get_all(55).collect::<Vec<_>>(),
            vec!["EUR/USD", "GBP/USD"]
        );
    }

    #[test]
    fn groups_are_addressed_by_count_tag() {
        let mut entry = FieldMap::new();
        entry.set(tags::SYMBOL, "EUR/USD");
        let mut map = FieldMap::new();
        map.set_group(tags::NO_RELATED_SYM, vec![entry]);

        let group = map.group(tags::NO_RELATED_SYM).unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group[0].get(tags::SYMBOL), Some("EUR/USD"));
        assert_eq!(map.get(tags::NO_RELATED_SYM), None);
        assert!(map.contains(tags::NO_RELATED_SYM));
    }

    #[test]
    fn remove_drops_every_occurrence() {
        let mut map = FieldMap::new();
        map.push(1, "a");
        map.push(1, "b");
        map.push(2, "c");
        map.remove(1);
        assert_eq!(map.len(), 1);
        assert!(!map.contains(1));
    }

    #[test]
    fn message_accessors() {
        let mut msg = Message::new(tags::msg_type::LOGON);
        msg.header.set(tags::MSG_SEQ_NUM, "7");
        msg.body.set(tags::HEART_BT_INT, "30");

        assert_eq!(msg.msg_type(), "A");
        assert_eq!(msg.seq_num(), Some(7));
        assert_eq!(msg.get(tags::HEART_BT_INT), Some("30"));
        assert!(msg.is_admin());
        assert_eq!(msg.begin_string(), None);
    }

    #[test]
    fn timestamps_use_fix_formats() {
        let at = DateTime::parse_from_rfc3339("2026-03-04T05:06:07.089Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(utc_timestamp(at), "20260304-05:06:07.089");
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(local_mkt_date(date), "20261231");
    }

    #[test]
    fn display_flattens_groups() {
        let mut msg = Message::new(tags::msg_type::MARKET_DATA_REQUEST);
        let entries = ["0", "1"]
            .iter()
            .map(|code| {
                let mut e = FieldMap::new();
                e.set(tags::MD_ENTRY_TYPE, *code);
                e
            })
            .collect();
        msg.body.set(tags::MD_REQ_ID, "r1");
        msg.body.set_group(tags::NO_MD_ENTRY_TYPES, entries);

        assert_eq!(msg.to_string(), "35=V|262=r1|267=2|269=0|269=1");
    }
}
