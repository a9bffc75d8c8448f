//! FIX enumeration tables.
//!
//! Each table maps a canonical upper-case token to its FIX code. Codes are
//! the values defined by the FIX 5.0 SP2 data dictionary; FIX 4.4 uses the
//! same codes for every entry listed here.

/// `(canonical token, wire code)`.
pub type Entry = (&'static str, &'static str);

/// Side (54).
pub const ORDER_SIDES: &[Entry] = &[
    ("BUY", "1"),
    ("SELL", "2"),
    ("BUY_MINUS", "3"),
    ("SELL_PLUS", "4"),
    ("SELL_SHORT", "5"),
    ("SELL_SHORT_EXEMPT", "6"),
    ("UNDISCLOSED", "7"),
    ("CROSS", "8"),
    ("CROSS_SHORT", "9"),
    ("CROSS_SHORT_EXEMPT", "A"),
    ("AS_DEFINED", "B"),
    ("OPPOSITE", "C"),
    ("SUBSCRIBE", "D"),
    ("REDEEM", "E"),
    ("LEND", "F"),
    ("BORROW", "G"),
    ("SELL_UNDISCLOSED", "H"),
];

/// OrdType (40).
pub const ORDER_TYPES: &[Entry] = &[
    ("MARKET", "1"),
    ("LIMIT", "2"),
    ("STOP", "3"),
    ("STOP_LIMIT", "4"),
    ("WITH_OR_WITHOUT", "6"),
    ("LIMIT_OR_BETTER", "7"),
    ("LIMIT_WITH_OR_WITHOUT", "8"),
    ("ON_BASIS", "9"),
    ("PREVIOUSLY_QUOTED", "D"),
    ("PREVIOUSLY_INDICATED", "E"),
    ("FOREX_SWAP", "G"),
    ("FUNARI", "I"),
    ("MARKET_IF_TOUCHED", "J"),
    ("MARKET_WITH_LEFTOVER_AS_LIMIT", "K"),
    ("PREVIOUS_FUND_VALUATION_POINT", "L"),
    ("NEXT_FUND_VALUATION_POINT", "M"),
    ("PEGGED", "P"),
    ("COUNTER_ORDER_SELECTION", "Q"),
    ("STOP_ON_BID_OR_OFFER", "R"),
    ("STOP_LIMIT_ON_BID_OR_OFFER", "S"),
];

/// TimeInForce (59).
pub const TIME_IN_FORCES: &[Entry] = &[
    ("DAY", "0"),
    ("GOOD_TILL_CANCEL", "1"),
    ("AT_THE_OPENING", "2"),
    ("IMMEDIATE_OR_CANCEL", "3"),
    ("FILL_OR_KILL", "4"),
    ("GOOD_TILL_CROSSING", "5"),
    ("GOOD_TILL_DATE", "6"),
    ("AT_THE_CLOSE", "7"),
    ("GOOD_THROUGH_CROSSING", "8"),
    ("AT_CROSSING", "9"),
    ("GOOD_FOR_TIME", "A"),
    ("GOOD_FOR_AUCTION", "B"),
    ("GOOD_FOR_MONTH", "C"),
];

/// PartyIDSource (447).
pub const PARTY_ID_SOURCES: &[Entry] = &[
    ("KOREAN_INVESTOR_ID", "1"),
    ("TAIWANESE_QUALIFIED_FOREIGN_INVESTOR_ID", "2"),
    ("TAIWANESE_TRADING_ACCOUNT", "3"),
    ("MALAYSIAN_CENTRAL_DEPOSITORY", "4"),
    ("CHINESE_INVESTOR_ID", "5"),
    ("UK_NATIONAL_INSURANCE_OR_PENSION_NUMBER", "6"),
    ("US_SOCIAL_SECURITY_NUMBER", "7"),
    ("US_EMPLOYER_OR_TAX_ID_NUMBER", "8"),
    ("AUSTRALIAN_BUSINESS_NUMBER", "9"),
    ("AUSTRALIAN_TAX_FILE_NUMBER", "A"),
    ("BIC", "B"),
    ("GENERALLY_ACCEPTED_MARKET_PARTICIPANT_IDENTIFIER", "C"),
    ("PROPRIETARY", "D"),
    ("ISO_COUNTRY_CODE", "E"),
    ("SETTLEMENT_ENTITY_LOCATION", "F"),
    ("MIC", "G"),
    ("CSD_PARTICIPANT", "H"),
    ("ISITC_ACRONYM", "I"),
    ("TAX_ID", "J"),
    ("AUSTRALIAN_COMPANY_NUMBER", "K"),
    ("AUSTRALIAN_REGISTERED_BODY_NUMBER", "L"),
    ("CFTC_REPORTING_FIRM_IDENTIFIER", "M"),
    ("LEGAL_ENTITY_IDENTIFIER", "N"),
    ("INTERIM_IDENTIFIER", "O"),
    ("SHORT_CODE_IDENTIFIER", "P"),
    ("NATIONAL_ID_NATURAL_PERSON", "Q"),
];

/// PartyRole (452).
pub const PARTY_ROLES: &[Entry] = &[
    ("EXECUTING_FIRM", "1"),
    ("BROKER_OF_CREDIT", "2"),
    ("CLIENT_ID", "3"),
    ("CLEARING_FIRM", "4"),
    ("INVESTOR_ID", "5"),
    ("INTRODUCING_FIRM", "6"),
    ("ENTERING_FIRM", "7"),
    ("LOCATE", "8"),
    ("FUND_MANAGER_CLIENT_ID", "9"),
    ("SETTLEMENT_LOCATION", "10"),
    ("ORDER_ORIGINATION_TRADER", "11"),
    ("EXECUTING_TRADER", "12"),
    ("ORDER_ORIGINATION_FIRM", "13"),
    ("GIVEUP_CLEARING_FIRM", "14"),
    ("CORRESPONDANT_CLEARING_FIRM", "15"),
    ("EXECUTING_SYSTEM", "16"),
    ("CONTRA_FIRM", "17"),
    ("CONTRA_CLEARING_FIRM", "18"),
    ("SPONSORING_FIRM", "19"),
    ("UNDERLYING_CONTRA_FIRM", "20"),
    ("CLEARING_ORGANIZATION", "21"),
    ("EXCHANGE", "22"),
    ("CUSTOMER_ACCOUNT", "24"),
    ("CORRESPONDENT_CLEARING_ORGANIZATION", "25"),
    ("CORRESPONDENT_BROKER", "26"),
    ("BUYER_SELLER", "27"),
    ("CUSTODIAN", "28"),
    ("INTERMEDIARY", "29"),
    ("AGENT", "30"),
    ("SUB_CUSTODIAN", "31"),
    ("BENEFICIARY", "32"),
    ("INTERESTED_PARTY", "33"),
    ("REGULATORY_BODY", "34"),
    ("LIQUIDITY_PROVIDER", "35"),
    ("ENTERING_TRADER", "36"),
    ("CONTRA_TRADER", "37"),
    ("POSITION_ACCOUNT", "38"),
    ("MARKET_MAKER", "66"),
    ("INVESTMENT_DECISION_MAKER", "122"),
];

/// OrderOrigination (1724).
pub const ORDER_ORIGINATIONS: &[Entry] = &[
    ("ORDER_RECEIVED_FROM_A_CUSTOMER", "1"),
    ("ORDER_RECEIVED_FROM_WITHIN_THE_FIRM", "2"),
    ("ORDER_RECEIVED_FROM_ANOTHER_BROKER_DEALER", "3"),
    (
        "ORDER_RECEIVED_FROM_A_CUSTOMER_OR_ORIGINATED_FROM_WITHIN_THE_FIRM",
        "4",
    ),
    (
        "ORDER_RECEIVED_FROM_A_DIRECT_ACCESS_OR_SPONSORED_ACCESS_CUSTOMER",
        "5",
    ),
    ("ORDER_RECEIVED_FROM_A_FOREIGN_DEALER_EQUIVALENT", "6"),
    ("ORDER_RECEIVED_FROM_AN_EXECUTION_ONLY_SERVICE", "7"),
];

/// MDEntryType (269).
pub const MD_ENTRY_TYPES: &[Entry] = &[
    ("BID", "0"),
    ("OFFER", "1"),
    ("TRADE", "2"),
    ("INDEX_VALUE", "3"),
    ("OPENING_PRICE", "4"),
    ("CLOSING_PRICE", "5"),
    ("SETTLEMENT_PRICE", "6"),
    ("TRADING_SESSION_HIGH_PRICE", "7"),
    ("TRADING_SESSION_LOW_PRICE", "8"),
    ("TRADING_SESSION_VWAP_PRICE", "9"),
    ("IMBALANCE", "A"),
    ("TRADE_VOLUME", "B"),
    ("OPEN_INTEREST", "C"),
    ("COMPOSITE_UNDERLYING_PRICE", "D"),
    ("SIMULATED_SELL_PRICE", "E"),
    ("SIMULATED_BUY_PRICE", "F"),
    ("MARGIN_RATE", "G"),
    ("MID_PRICE", "H"),
    ("EMPTY_BOOK", "J"),
    ("SETTLE_HIGH_PRICE", "K"),
    ("SETTLE_LOW_PRICE", "L"),
    ("PRIOR_SETTLE_PRICE", "M"),
    ("SESSION_HIGH_BID", "N"),
    ("SESSION_LOW_OFFER", "O"),
    ("EARLY_PRICES", "P"),
    ("AUCTION_CLEARING_PRICE", "Q"),
    ("SWAP_VALUE_FACTOR", "S"),
];

/// SubscriptionRequestType (263).
pub const SUBSCRIPTION_REQUEST_TYPES: &[Entry] = &[
    ("SNAPSHOT", "0"),
    ("SNAPSHOT_AND_UPDATES", "1"),
    ("DISABLE_PREVIOUS_SNAPSHOT", "2"),
];

/// SecurityListRequestType (559).
pub const SECURITY_LIST_REQUEST_TYPES: &[Entry] = &[
    ("SYMBOL", "0"),
    ("SECURITY_TYPE_AND_OR_CFICODE", "1"),
    ("PRODUCT", "2"),
    ("TRADING_SESSION_ID", "3"),
    ("ALL_SECURITIES", "4"),
    ("MARKET_ID_OR_MARKET_ID_PLUS_MARKET_SEGMENT_ID", "5"),
];

/// MDUpdateType (265).
pub const MD_UPDATE_TYPES: &[Entry] = &[("FULL_REFRESH", "0"), ("INCREMENTAL_REFRESH", "1")];
