//! Port Interfaces
//!
//! Contracts between the session orchestrator and the FIX engine that
//! carries its messages.
//!
//! ## Driven Ports (Outbound)
//!
//! - `ConnectionContext`: resolved sessions and initiator settings
//! - `Engine`: creates an initiator for one session
//! - `Initiator`: starts, stops and sends on that session
//! - `MessageSink`: displays inbound application messages
//!
//! ## Driver Ports (Inbound)
//!
//! - `Application`: lifecycle callbacks the engine invokes

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::message::Message;
use crate::domain::session::SessionDefinition;

/// Socket and timer settings of an initiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatorSettings {
    /// Name used to reference the initiator from a context.
    pub name: String,
    /// Acceptor host.
    pub host: String,
    /// Acceptor port.
    pub port: u16,
    /// Connect timeout; `Duration::ZERO` means unset.
    pub socket_timeout: Duration,
    /// HeartBtInt sent on Logon.
    pub heartbeat_interval: Duration,
    /// Initial delay between connection attempts.
    pub reconnect_interval: Duration,
    /// Connection retries before giving up (0 = unlimited).
    pub max_reconnect_attempts: u32,
}

/// Settings an engine needs to open one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Where and how to connect.
    pub initiator: InitiatorSettings,
    /// The session to open.
    pub session: SessionDefinition,
}

/// A resolved connection context: sessions plus the initiator that
/// carries them. Resolution has already validated it.
pub trait ConnectionContext: Send + Sync {
    /// Context name.
    fn name(&self) -> &str;

    /// Session definitions in configuration order.
    fn sessions(&self) -> &[SessionDefinition];

    /// Initiator settings.
    fn initiator(&self) -> &InitiatorSettings;

    /// Engine settings for one of this context's sessions.
    fn to_engine_settings(&self, session: &SessionDefinition) -> EngineSettings {
        EngineSettings {
            initiator: self.initiator().clone(),
            session: session.clone(),
        }
    }
}

/// Engine failures.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Settings are unusable.
    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),

    /// `start` called twice.
    #[error("initiator already started")]
    AlreadyStarted,

    /// Send attempted without an active session.
    #[error("session is not logged on")]
    NotLoggedOn,

    /// Initiator has been stopped.
    #[error("initiator stopped")]
    Stopped,

    /// Socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frame on the wire.
    #[error("codec error: {0}")]
    Codec(String),

    /// Every connection attempt failed.
    #[error("gave up after {0} connection attempts")]
    ReconnectExhausted(u32),
}

/// Lifecycle callbacks invoked by the engine's connection task.
///
/// Implementations must not block; they run on the engine task.
pub trait Application: Send + Sync {
    /// Logon completed; the session can carry application messages.
    fn on_logon(&self);

    /// Session ended (Logout exchanged or connection lost).
    fn on_logout(&self);

    /// Inbound application message, or a session-level Reject.
    fn from_app(&self, msg: Message);
}

/// Factory for initiators.
pub trait Engine: Send + Sync {
    /// Create an initiator for `settings`, reporting to `application`.
    ///
    /// With `engine_logging` set, every frame is traced.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidSettings` when the settings are unusable.
    fn initiate(
        &self,
        application: Arc<dyn Application>,
        settings: EngineSettings,
        engine_logging: bool,
    ) -> Result<Box<dyn Initiator>, EngineError>;
}

/// A session initiator.
#[async_trait]
pub trait Initiator: Send + Sync {
    /// Register the connection attempt. Returns once the socket work is
    /// running in the background.
    async fn start(&self) -> Result<(), EngineError>;

    /// Log out and tear down. Calling it again is a no-op.
    async fn stop(&self) -> Result<(), EngineError>;

    /// Send one application message on the active session. Resolves with
    /// the MsgSeqNum it was stamped with once the frame has been written to
    /// the socket, or with the write error.
    async fn send(&self, msg: Message) -> Result<u64, EngineError>;
}

/// Destination for inbound application messages.
pub trait MessageSink: Send + Sync {
    /// Present one message.
    fn display(&self, msg: &Message);
}
