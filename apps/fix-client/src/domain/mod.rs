//! Domain Layer - Protocol vocabulary and validated request values.
//!
//! Pure types with no I/O: enum dictionaries, the message model, session
//! definitions and trading intents.

/// Enum token to FIX code dictionaries.
pub mod dict;

/// Validated, immutable trading intents.
pub mod intent;

/// Ordered FIX message model and tag constants.
pub mod message;

/// Counterparty session definitions.
pub mod session;
