//! Heartbeat Monitor
//!
//! Keeps a logged-on session alive and detects a silent counterparty.
//! Sends a Heartbeat after `HeartBtInt` of outbound silence, a TestRequest
//! after 1.2 x `HeartBtInt` of inbound silence, and declares the link dead
//! after 2 x `HeartBtInt`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Timer thresholds.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Outbound silence before a Heartbeat is sent.
    pub interval: Duration,
    /// Inbound silence before a TestRequest is sent.
    pub test_request_after: Duration,
    /// Inbound silence before the connection is considered dead.
    pub timeout: Duration,
}

impl HeartbeatConfig {
    /// Derive thresholds from the negotiated HeartBtInt.
    #[must_use]
    pub fn from_interval(interval: Duration) -> Self {
        Self {
            interval,
            test_request_after: interval.mul_f64(1.2),
            timeout: interval * 2,
        }
    }

    fn tick(&self) -> Duration {
        (self.interval / 4).clamp(Duration::from_millis(10), Duration::from_secs(1))
    }
}

/// Events emitted by the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeartbeatEvent {
    /// Send a Heartbeat.
    SendHeartbeat,
    /// Send a TestRequest.
    SendTestRequest,
    /// Counterparty silent too long.
    Timeout,
}

/// Traffic timestamps shared between the monitor and the connection task.
#[derive(Debug)]
pub struct HeartbeatState {
    last_received: RwLock<Instant>,
    last_sent: RwLock<Instant>,
    awaiting_response: AtomicBool,
}

impl Default for HeartbeatState {
    fn default() -> Self {
        Self::new()
    }
}

impl HeartbeatState {
    /// Fresh state, both clocks at now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_received: RwLock::new(now),
            last_sent: RwLock::new(now),
            awaiting_response: AtomicBool::new(false),
        }
    }

    /// Any inbound message arrived.
    pub fn record_received(&self) {
        *self.last_received.write() = Instant::now();
        self.awaiting_response.store(false, Ordering::SeqCst);
    }

    /// Any outbound message was written.
    pub fn record_sent(&self) {
        *self.last_sent.write() = Instant::now();
    }

    /// A TestRequest is outstanding.
    #[must_use]
    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response.load(Ordering::SeqCst)
    }

    fn mark_test_request(&self) {
        self.awaiting_response.store(true, Ordering::SeqCst);
    }

    fn since_received(&self) -> Duration {
        self.last_received.read().elapsed()
    }

    fn since_sent(&self) -> Duration {
        self.last_sent.read().elapsed()
    }
}

/// Periodic checker that emits [`HeartbeatEvent`]s.
pub struct HeartbeatMonitor {
    config: HeartbeatConfig,
    state: Arc<HeartbeatState>,
    event_tx: mpsc::Sender<HeartbeatEvent>,
    cancel: CancellationToken,
}

impl HeartbeatMonitor {
    /// Create a monitor.
    #[must_use]
    pub const fn new(
        config: HeartbeatConfig,
        state: Arc<HeartbeatState>,
        event_tx: mpsc::Sender<HeartbeatEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            state,
            event_tx,
            cancel,
        }
    }

    /// Run until cancelled, the event channel closes, or a timeout fires.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.config.tick());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::debug!("Heartbeat monitor cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if !self.check().await {
                        break;
                    }
                }
            }
        }
    }

    /// Returns `false` when the loop should exit.
    async fn check(&self) -> bool {
        let silent_for = self.state.since_received();

        let event = if silent_for >= self.config.timeout {
            tracing::warn!(
                silent_ms = u64::try_from(silent_for.as_millis()).unwrap_or(u64::MAX),
                "Heartbeat timeout detected"
            );
            let _ = self.event_tx.send(HeartbeatEvent::Timeout).await;
            return false;
        } else if silent_for >= self.config.test_request_after && !self.state.is_awaiting_response()
        {
            self.state.mark_test_request();
            Some(HeartbeatEvent::SendTestRequest)
        } else if self.state.since_sent() >= self.config.interval {
            Some(HeartbeatEvent::SendHeartbeat)
        } else {
            None
        };

        match event {
            Some(event) => {
                if self.event_tx.send(event).await.is_err() {
                    tracing::debug!("Event channel closed, stopping heartbeat");
                    return false;
                }
                true
            }
            None => true,
        }
    }
}
