//! FIX tag numbers used by the client.

/// Account (1).
pub const ACCOUNT: u32 = 1;
/// BeginSeqNo (7).
pub const BEGIN_SEQ_NO: u32 = 7;
/// BeginString (8).
pub const BEGIN_STRING: u32 = 8;
/// BodyLength (9).
pub const BODY_LENGTH: u32 = 9;
/// CheckSum (10).
pub const CHECK_SUM: u32 = 10;
/// ClOrdID (11).
pub const CL_ORD_ID: u32 = 11;
/// EndSeqNo (16).
pub const END_SEQ_NO: u32 = 16;
/// MsgSeqNum (34).
pub const MSG_SEQ_NUM: u32 = 34;
/// MsgType (35).
pub const MSG_TYPE: u32 = 35;
/// NewSeqNo (36).
pub const NEW_SEQ_NO: u32 = 36;
/// OrderQty (38).
pub const ORDER_QTY: u32 = 38;
/// OrdStatus (39).
pub const ORD_STATUS: u32 = 39;
/// OrdType (40).
pub const ORD_TYPE: u32 = 40;
/// PossDupFlag (43).
pub const POSS_DUP_FLAG: u32 = 43;
/// Price (44).
pub const PRICE: u32 = 44;
/// RefSeqNum (45).
pub const REF_SEQ_NUM: u32 = 45;
/// SenderCompID (49).
pub const SENDER_COMP_ID: u32 = 49;
/// SenderSubID (50).
pub const SENDER_SUB_ID: u32 = 50;
/// SendingTime (52).
pub const SENDING_TIME: u32 = 52;
/// Side (54).
pub const SIDE: u32 = 54;
/// Symbol (55).
pub const SYMBOL: u32 = 55;
/// TargetCompID (56).
pub const TARGET_COMP_ID: u32 = 56;
/// TargetSubID (57).
pub const TARGET_SUB_ID: u32 = 57;
/// Text (58).
pub const TEXT: u32 = 58;
/// TimeInForce (59).
pub const TIME_IN_FORCE: u32 = 59;
/// TransactTime (60).
pub const TRANSACT_TIME: u32 = 60;
/// PossResend (97).
pub const POSS_RESEND: u32 = 97;
/// EncryptMethod (98).
pub const ENCRYPT_METHOD: u32 = 98;
/// HeartBtInt (108).
pub const HEART_BT_INT: u32 = 108;
/// TestReqID (112).
pub const TEST_REQ_ID: u32 = 112;
/// OrigSendingTime (122).
pub const ORIG_SENDING_TIME: u32 = 122;
/// GapFillFlag (123).
pub const GAP_FILL_FLAG: u32 = 123;
/// ExpireTime (126).
pub const EXPIRE_TIME: u32 = 126;
/// ResetSeqNumFlag (141).
pub const RESET_SEQ_NUM_FLAG: u32 = 141;
/// NoRelatedSym (146).
pub const NO_RELATED_SYM: u32 = 146;
/// ExecType (150).
pub const EXEC_TYPE: u32 = 150;
/// SecurityType (167).
pub const SECURITY_TYPE: u32 = 167;
/// RefTagID (371).
pub const REF_TAG_ID: u32 = 371;
/// RefMsgType (372).
pub const REF_MSG_TYPE: u32 = 372;
/// SessionRejectReason (373).
pub const SESSION_REJECT_REASON: u32 = 373;
/// BusinessRejectRefID (379).
pub const BUSINESS_REJECT_REF_ID: u32 = 379;
/// BusinessRejectReason (380).
pub const BUSINESS_REJECT_REASON: u32 = 380;
/// ExpireDate (432).
pub const EXPIRE_DATE: u32 = 432;
/// PartyIDSource (447).
pub const PARTY_ID_SOURCE: u32 = 447;
/// PartyID (448).
pub const PARTY_ID: u32 = 448;
/// PartyRole (452).
pub const PARTY_ROLE: u32 = 452;
/// NoPartyIDs (453).
pub const NO_PARTY_IDS: u32 = 453;
/// Username (553).
pub const USERNAME: u32 = 553;
/// Password (554).
pub const PASSWORD: u32 = 554;
/// SecurityReqID (320).
pub const SECURITY_REQ_ID: u32 = 320;
/// SecurityListRequestType (559).
pub const SECURITY_LIST_REQUEST_TYPE: u32 = 559;
/// MDReqID (262).
pub const MD_REQ_ID: u32 = 262;
/// SubscriptionRequestType (263).
pub const SUBSCRIPTION_REQUEST_TYPE: u32 = 263;
/// MarketDepth (264).
pub const MARKET_DEPTH: u32 = 264;
/// MDUpdateType (265).
pub const MD_UPDATE_TYPE: u32 = 265;
/// NoMDEntryTypes (267).
pub const NO_MD_ENTRY_TYPES: u32 = 267;
/// NoMDEntries (268).
pub const NO_MD_ENTRIES: u32 = 268;
/// MDEntryType (269).
pub const MD_ENTRY_TYPE: u32 = 269;
/// MDEntryPx (270).
pub const MD_ENTRY_PX: u32 = 270;
/// MDEntrySize (271).
pub const MD_ENTRY_SIZE: u32 = 271;
/// MDReqRejReason (281).
pub const MD_REQ_REJ_REASON: u32 = 281;
/// LastFragment (893).
pub const LAST_FRAGMENT: u32 = 893;
/// DefaultApplVerID (1137).
pub const DEFAULT_APPL_VER_ID: u32 = 1137;
/// OrderOrigination (1724).
pub const ORDER_ORIGINATION: u32 = 1724;

/// Header tags other than BeginString and BodyLength.
///
/// The decoder uses this to split an inbound frame into header and body.
pub const HEADER_TAGS: &[u32] = &[
    MSG_TYPE,
    SENDER_COMP_ID,
    TARGET_COMP_ID,
    SENDER_SUB_ID,
    TARGET_SUB_ID,
    MSG_SEQ_NUM,
    SENDING_TIME,
    POSS_DUP_FLAG,
    POSS_RESEND,
    ORIG_SENDING_TIME,
];

/// Whether a tag belongs in the standard header.
#[must_use]
pub fn is_header(tag: u32) -> bool {
    tag == BEGIN_STRING || tag == BODY_LENGTH || HEADER_TAGS.contains(&tag)
}

/// MsgType values.
pub mod msg_type {
    /// Heartbeat (0).
    pub const HEARTBEAT: &str = "0";
    /// TestRequest (1).
    pub const TEST_REQUEST: &str = "1";
    /// ResendRequest (2).
    pub const RESEND_REQUEST: &str = "2";
    /// Reject (3).
    pub const REJECT: &str = "3";
    /// SequenceReset (4).
    pub const SEQUENCE_RESET: &str = "4";
    /// Logout (5).
    pub const LOGOUT: &str = "5";
    /// ExecutionReport (8).
    pub const EXECUTION_REPORT: &str = "8";
    /// OrderCancelReject (9).
    pub const ORDER_CANCEL_REJECT: &str = "9";
    /// Logon (A).
    pub const LOGON: &str = "A";
    /// NewOrderSingle (D).
    pub const NEW_ORDER_SINGLE: &str = "D";
    /// MarketDataRequest (V).
    pub const MARKET_DATA_REQUEST: &str = "V";
    /// MarketDataSnapshotFullRefresh (W).
    pub const MARKET_DATA_SNAPSHOT: &str = "W";
    /// MarketDataIncrementalRefresh (X).
    pub const MARKET_DATA_INCREMENTAL: &str = "X";
    /// MarketDataRequestReject (Y).
    pub const MARKET_DATA_REQUEST_REJECT: &str = "Y";
    /// BusinessMessageReject (j).
    pub const BUSINESS_MESSAGE_REJECT: &str = "j";
    /// SecurityListRequest (x).
    pub const SECURITY_LIST_REQUEST: &str = "x";
    /// SecurityList (y).
    pub const SECURITY_LIST: &str = "y";

    /// Whether the message type belongs to the session layer.
    #[must_use]
    pub fn is_admin(msg_type: &str) -> bool {
        matches!(
            msg_type,
            HEARTBEAT | TEST_REQUEST | RESEND_REQUEST | REJECT | SEQUENCE_RESET | LOGOUT | LOGON
        )
    }
}
