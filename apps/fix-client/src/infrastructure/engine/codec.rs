//! FIX Wire Codec
//!
//! Frames `tag=value<SOH>` messages on a byte stream.
//!
//! - BeginString (8) first, BodyLength (9) second, MsgType (35) third
//! - CheckSum (10) last: byte sum modulo 256 as three digits
//! - Repeating groups are written as count tag followed by each entry
//!
//! Inbound frames are decoded flat: header tags go to the header map,
//! everything else is pushed to the body in wire order.

use std::fmt::Write as _;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::domain::message::{FieldMap, FieldValue, Message, tags};

/// Field delimiter.
pub const SOH: u8 = 0x01;

/// Largest body accepted from the wire.
const MAX_BODY_LENGTH: usize = 1 << 20;

/// Longest BeginString or BodyLength field, SOH excluded.
const MAX_HEADER_FIELD_LEN: usize = 32;

/// Length of the trailer `10=NNN<SOH>`.
const TRAILER_LEN: usize = 7;

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum FixCodecError {
    /// Socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame does not begin with `8=`.
    #[error("frame does not start with BeginString")]
    MissingBeginString,

    /// BodyLength is absent or not a number.
    #[error("malformed BodyLength: {0}")]
    MalformedBodyLength(String),

    /// BeginString or BodyLength runs past its length limit without SOH.
    #[error("unterminated {0} field")]
    UnterminatedField(&'static str),

    /// BodyLength exceeds the accepted maximum.
    #[error("frame body of {0} bytes exceeds limit")]
    FrameTooLarge(usize),

    /// Trailer is not `10=NNN`.
    #[error("missing or misplaced CheckSum")]
    MissingChecksum,

    /// Declared checksum differs from the computed one.
    #[error("invalid checksum: declared {declared:03}, computed {computed:03}")]
    InvalidChecksum {
        /// Checksum on the wire.
        declared: u8,
        /// Checksum over the received bytes.
        computed: u8,
    },

    /// A field lacks `=` or has a non-numeric tag.
    #[error("malformed field: {0}")]
    MalformedField(String),

    /// Outbound message has no BeginString.
    #[error("outbound message has no BeginString")]
    NoBeginString,
}

/// FIX checksum: sum of bytes modulo 256.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Tokio codec for FIX frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixCodec;

impl FixCodec {
    /// Create a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Decoder for FixCodec {
    type Item = Message;
    type Error = FixCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, FixCodecError> {
        if src.len() < 2 {
            return Ok(None);
        }
        if !src.starts_with(b"8=") {
            return Err(FixCodecError::MissingBeginString);
        }

        let Some(begin_end) = find_soh(src, 0) else {
            return pending_field(src.len(), "BeginString");
        };
        let length_start = begin_end + 1;
        let Some(length_end) = find_soh(src, length_start) else {
            return pending_field(src.len() - length_start, "BodyLength");
        };

        let length_field = &src[length_start..length_end];
        let body_len = length_field
            .strip_prefix(b"9=")
            .and_then(|v| std::str::from_utf8(v).ok())
            .and_then(|v| v.parse::<usize>().ok())
            .ok_or_else(|| {
                FixCodecError::MalformedBodyLength(String::from_utf8_lossy(length_field).into())
            })?;
        if body_len > MAX_BODY_LENGTH {
            return Err(FixCodecError::FrameTooLarge(body_len));
        }

        let body_start = length_end + 1;
        let trailer_start = body_start + body_len;
        let total = trailer_start + TRAILER_LEN;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let frame = src.split_to(total);
        let trailer = &frame[trailer_start..];
        if !trailer.starts_with(b"10=") || trailer[TRAILER_LEN - 1] != SOH {
            return Err(FixCodecError::MissingChecksum);
        }
        let declared = std::str::from_utf8(&trailer[3..6])
            .ok()
            .and_then(|v| v.parse::<u8>().ok())
            .ok_or(FixCodecError::MissingChecksum)?;
        let computed = checksum(&frame[..trailer_start]);
        if declared != computed {
            return Err(FixCodecError::InvalidChecksum { declared, computed });
        }

        let mut msg = Message::default();
        for field in frame[..trailer_start].split(|b| *b == SOH) {
            if field.is_empty() {
                continue;
            }
            let (tag, value) = split_field(field)?;
            match tag {
                tags::BODY_LENGTH => {}
                t if tags::is_header(t) => {
                    msg.header.set(t, value);
                }
                t => msg.body.push(t, value),
            }
        }
        Ok(Some(msg))
    }
}

/// More bytes may still complete a header field, unless it is already
/// longer than any valid one.
const fn pending_field(
    buffered: usize,
    name: &'static str,
) -> Result<Option<Message>, FixCodecError> {
    if buffered > MAX_HEADER_FIELD_LEN {
        Err(FixCodecError::UnterminatedField(name))
    } else {
        Ok(None)
    }
}

impl Encoder<Message> for FixCodec {
    type Error = FixCodecError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> Result<(), FixCodecError> {
        let begin_string = msg.begin_string().ok_or(FixCodecError::NoBeginString)?;

        let mut body = String::new();
        push_field(&mut body, tags::MSG_TYPE, msg.msg_type());
        for (tag, value) in msg.header.iter() {
            if matches!(
                tag,
                tags::BEGIN_STRING | tags::BODY_LENGTH | tags::MSG_TYPE | tags::CHECK_SUM
            ) {
                continue;
            }
            push_value(&mut body, tag, value);
        }
        write_map(&mut body, &msg.body);

        let mut head = String::new();
        push_field(&mut head, tags::BEGIN_STRING, begin_string);
        push_field(&mut head, tags::BODY_LENGTH, &body.len().to_string());

        let sum = checksum(head.as_bytes()).wrapping_add(checksum(body.as_bytes()));

        dst.reserve(head.len() + body.len() + TRAILER_LEN);
        dst.put_slice(head.as_bytes());
        dst.put_slice(body.as_bytes());
        dst.put_slice(format!("10={sum:03}").as_bytes());
        dst.put_u8(SOH);
        Ok(())
    }
}

fn find_soh(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .iter()
        .position(|b| *b == SOH)
        .map(|pos| from + pos)
}

fn split_field(field: &[u8]) -> Result<(u32, String), FixCodecError> {
    let malformed = || FixCodecError::MalformedField(String::from_utf8_lossy(field).into());
    let eq = field.iter().position(|b| *b == b'=').ok_or_else(malformed)?;
    let tag = std::str::from_utf8(&field[..eq])
        .ok()
        .and_then(|t| t.parse::<u32>().ok())
        .ok_or_else(malformed)?;
    let value = String::from_utf8_lossy(&field[eq + 1..]).into_owned();
    Ok((tag, value))
}

fn write_map(out: &mut String, map: &FieldMap) {
    for (tag, value) in map.iter() {
        push_value(out, tag, value);
    }
}

fn push_value(out: &mut String, tag: u32, value: &FieldValue) {
    match value {
        FieldValue::Scalar(v) => push_field(out, tag, v),
        FieldValue::Group(entries) => {
            push_field(out, tag, &entries.len().to_string());
            for entry in entries {
                write_map(out, entry);
            }
        }
    }
}

fn push_field(out: &mut String, tag: u32, value: &str) {
    let _ = write!(out, "{tag}={value}");
    out.push(char::from(SOH));
}
