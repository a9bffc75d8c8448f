//! Error taxonomy for the FIX client.
//!
//! Every failure reaching `main` is a [`FixClientError`]. Its
//! [`ErrorKind`] decides the process exit status, using the BSD
//! `sysexits` values so scripts can tell usage mistakes from
//! configuration problems and connectivity failures.
//!
//! | Kind | Variants | Exit |
//! |------|----------|------|
//! | `Validation` | `Validation` | 64 (`EX_USAGE`) |
//! | `Configuration` | `Config`, `NoSessions`, `UnsupportedProtocolVersion` | 78 (`EX_CONFIG`) |
//! | `Connectivity` | `ConnectionTimeout`, `LogoutBeforeConnect`, `Engine` | 69 (`EX_UNAVAILABLE`) |
//! | `Send` | `SendFailure` | 74 (`EX_IOERR`) |
//!
//! A signal-triggered shutdown is not an error and exits with 0.

use std::time::Duration;

use thiserror::Error;

use crate::application::ports::EngineError;
use crate::application::services::builder::BuildError;
use crate::domain::intent::ValidationError;
use crate::infrastructure::config::ConfigError;

/// Error categories, one exit status each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad command input.
    Validation,
    /// Configuration does not describe a usable session.
    Configuration,
    /// The session could not be established.
    Connectivity,
    /// The request could not be sent.
    Send,
}

impl ErrorKind {
    /// Process exit status for this kind.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation => 64,
            Self::Configuration => 78,
            Self::Connectivity => 69,
            Self::Send => 74,
        }
    }

    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::Configuration => "CONFIGURATION",
            Self::Connectivity => "CONNECTIVITY",
            Self::Send => "SEND",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level client error.
#[derive(Debug, Error)]
pub enum FixClientError {
    /// Command input rejected before any network activity.
    #[error("invalid arguments: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The connection context handed to the orchestrator lists no session.
    #[error("context '{0}' defines no sessions")]
    NoSessions(String),

    /// The session's version pair has no message layout.
    #[error(transparent)]
    UnsupportedProtocolVersion(#[from] BuildError),

    /// No Logon within the effective timeout.
    #[error("connection timed out after {0:?}")]
    ConnectionTimeout(Duration),

    /// The engine shut the session down before Logon completed.
    #[error("session logged out before connecting")]
    LogoutBeforeConnect,

    /// Engine could not be created or started.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The request could not be handed to the session.
    #[error("failed to send message: {0}")]
    SendFailure(#[source] EngineError),
}

impl FixClientError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) | Self::NoSessions(_) | Self::UnsupportedProtocolVersion(_) => {
                ErrorKind::Configuration
            }
            Self::ConnectionTimeout(_) | Self::LogoutBeforeConnect | Self::Engine(_) => {
                ErrorKind::Connectivity
            }
            Self::SendFailure(_) => ErrorKind::Send,
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}
