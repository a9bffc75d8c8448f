//! FIX Engine Adapter
//!
//! Plain-TCP FIX initiator implementing the application's engine ports.

pub mod codec;
pub mod heartbeat;
pub mod initiator;
pub mod reconnect;
pub mod session;

pub use codec::{FixCodec, FixCodecError};
pub use initiator::{SocketEngine, SocketInitiator, WIRE_TARGET};
pub use session::{FixSession, SessionEvent, SessionState};
