// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! FIX Client - Session Initiator Library
//!
//! Opens a FIX session with a counterparty acceptor, sends one request built
//! from command-line input and prints the responses.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: enum dictionaries, the ordered message model, session
//!   definitions and validated intents
//! - **Application**: ports, the message builder, the channel adapter and the
//!   orchestrator state machine
//! - **Infrastructure**: YAML configuration, the TCP session engine and
//!   tracing setup
//! - **CLI**: argument parsing, validation and display
//!
//! Data flows one way: intent → orchestrator → builder → initiator → wire.

/// Domain layer - Protocol vocabulary with no I/O.
pub mod domain;

/// Application layer - Ports and orchestration.
pub mod application;

/// Infrastructure layer - Configuration, engine and telemetry adapters.
pub mod infrastructure;

/// Command-line interface.
pub mod cli;

/// Error types and exit codes.
pub mod error;

pub use application::services::{Orchestrator, Outcome};
pub use domain::intent::{Intent, ValidationError};
pub use error::{ErrorKind, FixClientError};
