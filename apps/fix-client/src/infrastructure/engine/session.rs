//! FIX Session Layer
//!
//! Sequence numbers, header stamping and the administrative message flow
//! for one initiator session. No I/O happens here; the connection task
//! feeds inbound messages in and writes out whatever comes back.
//!
//! ```text
//! Disconnected -> (send Logon) -> LogonSent -> (receive Logon) -> Active
//! Active -> (send Logout) -> LogoutSent -> (receive Logout) -> Disconnected
//! ```

use std::time::Duration;

use chrono::Utc;

use crate::domain::message::{Message, tags, tags::msg_type, utc_timestamp};
use crate::domain::session::SessionDefinition;

/// Operational state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing exchanged yet.
    Disconnected,
    /// Logon sent, waiting for the counterparty's Logon.
    LogonSent,
    /// Logged on; application messages may flow.
    Active,
    /// Logout sent, waiting for the counterparty's Logout.
    LogoutSent,
}

/// Outcome of processing one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Write this (already stamped) message.
    Send(Message),
    /// Logon acknowledged.
    LoggedOn,
    /// Hand this message to the application.
    Deliver(Message),
    /// Logout exchange finished.
    LoggedOut,
    /// Unrecoverable; drop the connection.
    Disconnect(String),
}

/// Session context for one connection.
#[derive(Debug)]
pub struct FixSession {
    definition: SessionDefinition,
    heartbeat_interval: Duration,
    next_outgoing: u64,
    next_incoming: u64,
    test_requests: u64,
    state: SessionState,
}

impl FixSession {
    /// New session; sequence numbers start at 1.
    #[must_use]
    pub const fn new(definition: SessionDefinition, heartbeat_interval: Duration) -> Self {
        Self {
            definition,
            heartbeat_interval,
            next_outgoing: 1,
            next_incoming: 1,
            test_requests: 0,
            state: SessionState::Disconnected,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Next MsgSeqNum to be sent.
    #[must_use]
    pub const fn next_outgoing(&self) -> u64 {
        self.next_outgoing
    }

    /// Next MsgSeqNum expected from the counterparty.
    #[must_use]
    pub const fn next_incoming(&self) -> u64 {
        self.next_incoming
    }

    /// Stamp an application message with the session header.
    pub fn prepare(&mut self, mut msg: Message) -> Message {
        let seq = self.next_outgoing;
        self.next_outgoing += 1;
        self.stamp(&mut msg, seq);
        msg
    }

    /// Logon with ResetSeqNumFlag; moves to `LogonSent`.
    pub fn logon(&mut self) -> Message {
        let mut msg = Message::new(msg_type::LOGON);
        msg.body
            .set(tags::ENCRYPT_METHOD, "0")
            .set(tags::HEART_BT_INT, self.heartbeat_interval.as_secs().to_string())
            .set(tags::RESET_SEQ_NUM_FLAG, "Y");
        if !self.definition.username.is_empty() {
            msg.body.set(tags::USERNAME, self.definition.username.clone());
        }
        if !self.definition.password.is_empty() {
            msg.body.set(tags::PASSWORD, self.definition.password.clone());
        }
        if self.definition.begin_string.starts_with("FIXT")
            && !self.definition.default_appl_ver_id.is_empty()
        {
            msg.body.set(
                tags::DEFAULT_APPL_VER_ID,
                appl_ver_id_code(&self.definition.default_appl_ver_id),
            );
        }
        self.state = SessionState::LogonSent;
        self.prepare(msg)
    }

    /// Logout; moves to `LogoutSent`.
    pub fn logout(&mut self, text: Option<&str>) -> Message {
        let mut msg = Message::new(msg_type::LOGOUT);
        if let Some(text) = text {
            msg.body.set(tags::TEXT, text);
        }
        self.state = SessionState::LogoutSent;
        self.prepare(msg)
    }

    /// Heartbeat, echoing a TestReqID when answering a TestRequest.
    pub fn heartbeat(&mut self, test_req_id: Option<&str>) -> Message {
        let mut msg = Message::new(msg_type::HEARTBEAT);
        if let Some(id) = test_req_id {
            msg.body.set(tags::TEST_REQ_ID, id);
        }
        self.prepare(msg)
    }

    /// TestRequest with a fresh TestReqID.
    pub fn test_request(&mut self) -> Message {
        self.test_requests += 1;
        let mut msg = Message::new(msg_type::TEST_REQUEST);
        msg.body.set(tags::TEST_REQ_ID, format!("TEST-{}", self.test_requests));
        self.prepare(msg)
    }

    /// Process one inbound message.
    pub fn on_message(&mut self, msg: Message) -> Vec<SessionEvent> {
        let kind = msg.msg_type().to_string();

        if kind == msg_type::SEQUENCE_RESET {
            return self.on_sequence_reset(&msg);
        }

        let mut events = Vec::new();
        let Some(seq) = msg.seq_num() else {
            return vec![self.fatal("MsgSeqNum missing")];
        };

        if seq < self.next_incoming {
            if msg.get(tags::POSS_DUP_FLAG) == Some("Y") {
                tracing::debug!(seq, expected = self.next_incoming, "Ignoring possible duplicate");
                return events;
            }
            let text = format!(
                "MsgSeqNum too low, expecting {} but received {seq}",
                self.next_incoming
            );
            return vec![self.fatal(&text)];
        }

        if seq > self.next_incoming && kind != msg_type::LOGON {
            tracing::warn!(
                seq,
                expected = self.next_incoming,
                "Sequence gap, requesting resend"
            );
            let mut resend = Message::new(msg_type::RESEND_REQUEST);
            resend
                .body
                .set(tags::BEGIN_SEQ_NO, self.next_incoming.to_string())
                .set(tags::END_SEQ_NO, "0");
            events.push(SessionEvent::Send(self.prepare(resend)));
        }
        self.next_incoming = seq + 1;

        match kind.as_str() {
            msg_type::LOGON => {
                if self.state == SessionState::LogonSent {
                    self.state = SessionState::Active;
                    events.push(SessionEvent::LoggedOn);
                } else {
                    tracing::warn!(state = ?self.state, "Unexpected Logon");
                }
            }
            msg_type::HEARTBEAT => {}
            msg_type::TEST_REQUEST => {
                let id = msg.get(tags::TEST_REQ_ID).map(str::to_string);
                events.push(SessionEvent::Send(self.heartbeat(id.as_deref())));
            }
            msg_type::RESEND_REQUEST => {
                let begin = msg
                    .get(tags::BEGIN_SEQ_NO)
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                events.push(SessionEvent::Send(self.gap_fill(begin)));
            }
            msg_type::LOGOUT => {
                if self.state != SessionState::LogoutSent {
                    let reason = msg.get(tags::TEXT).unwrap_or_default();
                    tracing::info!(reason, "Counterparty initiated logout");
                    events.push(SessionEvent::Send(self.logout(None)));
                }
                self.state = SessionState::Disconnected;
                events.push(SessionEvent::LoggedOut);
            }
            msg_type::REJECT => {
                tracing::warn!(
                    ref_seq_num = msg.get(tags::REF_SEQ_NUM).unwrap_or_default(),
                    text = msg.get(tags::TEXT).unwrap_or_default(),
                    "Session-level reject"
                );
                events.push(SessionEvent::Deliver(msg));
            }
            _ if self.state == SessionState::Active || self.state == SessionState::LogoutSent => {
                events.push(SessionEvent::Deliver(msg));
            }
            _ => {
                tracing::warn!(msg_type = %kind, state = ?self.state, "Application message before logon");
            }
        }
        events
    }

    fn on_sequence_reset(&mut self, msg: &Message) -> Vec<SessionEvent> {
        let Some(new_seq) = msg
            .get(tags::NEW_SEQ_NO)
            .and_then(|v| v.parse::<u64>().ok())
        else {
            return vec![self.fatal("SequenceReset without NewSeqNo")];
        };
        if new_seq >= self.next_incoming {
            tracing::debug!(from = self.next_incoming, to = new_seq, "Sequence reset");
            self.next_incoming = new_seq;
        } else {
            tracing::warn!(
                new_seq,
                expected = self.next_incoming,
                "Ignoring SequenceReset to a lower number"
            );
        }
        Vec::new()
    }

    /// Gap fill covering `begin` up to our next outgoing number. Nothing
    /// is stored for replay.
    fn gap_fill(&mut self, begin: u64) -> Message {
        let mut msg = Message::new(msg_type::SEQUENCE_RESET);
        msg.header.set(tags::POSS_DUP_FLAG, "Y");
        msg.body
            .set(tags::GAP_FILL_FLAG, "Y")
            .set(tags::NEW_SEQ_NO, self.next_outgoing.to_string());
        let seq = begin.min(self.next_outgoing);
        self.stamp(&mut msg, seq);
        msg
    }

    fn fatal(&mut self, text: &str) -> SessionEvent {
        tracing::error!(reason = text, "Session protocol violation");
        self.state = SessionState::Disconnected;
        SessionEvent::Disconnect(text.to_string())
    }

    fn stamp(&self, msg: &mut Message, seq: u64) {
        let def = &self.definition;
        msg.header
            .set(tags::BEGIN_STRING, def.begin_string.clone())
            .set(tags::SENDER_COMP_ID, def.sender_comp_id.clone())
            .set(tags::TARGET_COMP_ID, def.target_comp_id.clone())
            .set(tags::MSG_SEQ_NUM, seq.to_string())
            .set(tags::SENDING_TIME, utc_timestamp(Utc::now()));
        if !def.sender_sub_id.is_empty() {
            msg.header.set(tags::SENDER_SUB_ID, def.sender_sub_id.clone());
        }
        if !def.target_sub_id.is_empty() {
            msg.header.set(tags::TARGET_SUB_ID, def.target_sub_id.clone());
        }
    }
}

/// ApplVerID wire code for a version string; unknown strings pass through.
#[must_use]
pub fn appl_ver_id_code(version: &str) -> &str {
    match version {
        "FIX.2.7" => "0",
        "FIX.3.0" => "1",
        "FIX.4.0" => "2",
        "FIX.4.1" => "3",
        "FIX.4.2" => "4",
        "FIX.4.3" => "5",
        "FIX.4.4" => "6",
        "FIX.5.0" => "7",
        "FIX.5.0SP1" => "8",
        "FIX.5.0SP2" => "9",
        other => other,
    }
}
