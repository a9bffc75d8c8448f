//! Channel-backed application adapter.
//!
//! Bridges engine callbacks to the orchestrator through two channels:
//!
//! - `connected`: fires once on Logon (capacity 1), closed on logout or stop
//! - `from_app`: one item per inbound application message, closed on
//!   logout or stop
//!
//! Closing is done by dropping the sender, so a closed channel is how the
//! orchestrator learns that the session is gone.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::application::ports::Application;
use crate::domain::message::Message;

/// Receiving ends handed to the orchestrator.
#[derive(Debug)]
pub struct SessionChannels {
    /// Fires once when the session logs on.
    pub connected: mpsc::Receiver<()>,
    /// Inbound application messages.
    pub from_app: mpsc::UnboundedReceiver<Message>,
}

/// [`Application`] implementation that forwards into channels.
#[derive(Debug)]
pub struct ChannelApplication {
    connected: Mutex<Option<mpsc::Sender<()>>>,
    from_app: Mutex<Option<mpsc::UnboundedSender<Message>>>,
}

impl ChannelApplication {
    /// Create the adapter and its receivers.
    #[must_use]
    pub fn new() -> (Arc<Self>, SessionChannels) {
        let (connected_tx, connected_rx) = mpsc::channel(1);
        let (app_tx, app_rx) = mpsc::unbounded_channel();
        let app = Arc::new(Self {
            connected: Mutex::new(Some(connected_tx)),
            from_app: Mutex::new(Some(app_tx)),
        });
        (
            app,
            SessionChannels {
                connected: connected_rx,
                from_app: app_rx,
            },
        )
    }

    /// Close both channels. Idempotent.
    pub fn stop(&self) {
        let had_connected = self.connected.lock().take().is_some();
        let had_app = self.from_app.lock().take().is_some();
        if had_connected || had_app {
            tracing::debug!("Application adapter stopped");
        }
    }
}

impl Application for ChannelApplication {
    fn on_logon(&self) {
        if let Some(tx) = self.connected.lock().as_ref() {
            // Capacity 1 and a single logon per run: a full channel only
            // means the signal is already pending.
            let _ = tx.try_send(());
        }
    }

    fn on_logout(&self) {
        tracing::debug!("Session logged out");
        self.stop();
    }

    fn from_app(&self, msg: Message) {
        if let Some(tx) = self.from_app.lock().as_ref()
            && tx.send(msg).is_err()
        {
            tracing::debug!("Application channel receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::tags::msg_type;

    impl ChannelApplication {
        fn is_stopped(&self) -> bool {
            self.from_app.lock().is_none()
        }
    }

    #[tokio::test]
    async fn logon_fires_connected() {
        let (app, mut channels) = ChannelApplication::new();
        app.on_logon();
        app.on_logon();
        assert_eq!(channels.connected.recv().await, Some(()));
    }

    #[tokio::test]
    async fn messages_are_forwarded_in_order() {
        let (app, mut channels) = ChannelApplication::new();
        app.from_app(Message::new(msg_type::MARKET_DATA_SNAPSHOT));
        app.from_app(Message::new(msg_type::MARKET_DATA_INCREMENTAL));

        assert_eq!(channels.from_app.recv().await.unwrap().msg_type(), "W");
        assert_eq!(channels.from_app.recv().await.unwrap().msg_type(), "X");
    }

    #[tokio::test]
    async fn logout_closes_both_channels() {
        let (app, mut channels) = ChannelApplication::new();
        app.on_logout();

        assert_eq!(channels.connected.recv().await, None);
        assert!(channels.from_app.recv().await.is_none());
        assert!(app.is_stopped());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let (app, mut channels) = ChannelApplication::new();
        app.stop();
        app.stop();
        app.on_logon();
        app.from_app(Message::new(msg_type::SECURITY_LIST));

        assert_eq!(channels.connected.recv().await, None);
        assert!(channels.from_app.recv().await.is_none());
    }
}
