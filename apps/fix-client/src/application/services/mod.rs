//! Application Services
//!
//! - `builder`: intent to message, per version pair
//! - `channel_app`: engine callbacks to orchestrator channels
//! - `orchestrator`: the request lifecycle state machine

pub mod builder;
pub mod channel_app;
pub mod orchestrator;

pub use builder::{BuildError, build};
pub use channel_app::{ChannelApplication, SessionChannels};
pub use orchestrator::{DEFAULT_CONNECT_TIMEOUT, Orchestrator, Outcome, Phase, effective_timeout};
