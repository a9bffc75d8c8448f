//! Session Orchestrator
//!
//! Drives one request cycle over a FIX session:
//!
//! ```text
//! Idle -> Starting -> AwaitingConnect -> Connected -> Sending -> Streaming
//!                                                                  |
//!                                   Terminated <- ShuttingDown <---+
//! ```
//!
//! Any failure jumps straight to `ShuttingDown`. Nothing is sent before
//! `Sending`, and a failed send is never retried. The only blocking points
//! are the connect wait and the single `select!` of the streaming loop.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::builder;
use super::channel_app::{ChannelApplication, SessionChannels};
use crate::application::ports::{ConnectionContext, Engine, Initiator, MessageSink};
use crate::domain::intent::{Intent, ResponseMatch};
use crate::domain::message::Message;
use crate::domain::session::SessionDefinition;
use crate::error::FixClientError;

/// Connect timeout used when neither the command line nor the initiator
/// configuration sets one.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing started.
    Idle,
    /// Context resolved, engine being created.
    Starting,
    /// Initiator started, waiting for Logon.
    AwaitingConnect,
    /// Logged on.
    Connected,
    /// Building and sending the request.
    Sending,
    /// Waiting for responses or a shutdown signal.
    Streaming,
    /// Stopping the adapter and the initiator.
    ShuttingDown,
    /// Done.
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::AwaitingConnect => "awaiting_connect",
            Self::Connected => "connected",
            Self::Sending => "sending",
            Self::Streaming => "streaming",
            Self::ShuttingDown => "shutting_down",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The terminal response for the request arrived.
    Completed,
    /// A shutdown signal was received.
    Interrupted,
    /// The session closed without a terminal response.
    SessionClosed,
}

/// Pick the connect timeout: command line, then initiator socket timeout,
/// then [`DEFAULT_CONNECT_TIMEOUT`]. Zero means unset at every level.
#[must_use]
pub fn effective_timeout(cli: Option<Duration>, socket_timeout: Duration) -> Duration {
    [cli.unwrap_or_default(), socket_timeout]
        .into_iter()
        .find(|d| !d.is_zero())
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT)
}

/// Runs one intent against one connection context.
pub struct Orchestrator {
    engine: Arc<dyn Engine>,
    sink: Arc<dyn MessageSink>,
    shutdown: CancellationToken,
    timeout: Option<Duration>,
    engine_logging: bool,
    phase: Phase,
}

impl Orchestrator {
    /// Create an orchestrator.
    ///
    /// `timeout` is the command-line connect timeout, if any. Cancelling
    /// `shutdown` ends the run gracefully.
    #[must_use]
    pub fn new(
        engine: Arc<dyn Engine>,
        sink: Arc<dyn MessageSink>,
        shutdown: CancellationToken,
        timeout: Option<Duration>,
        engine_logging: bool,
    ) -> Self {
        Self {
            engine,
            sink,
            shutdown,
            timeout,
            engine_logging,
            phase: Phase::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    fn transition(&mut self, next: Phase) {
        tracing::debug!(from = %self.phase, to = %next, "Orchestrator transition");
        self.phase = next;
    }

    /// Run the full cycle for `intent`.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the adapter and the initiator are stopped
    /// before returning either way.
    pub async fn run(
        &mut self,
        context: &dyn ConnectionContext,
        intent: &Intent,
    ) -> Result<Outcome, FixClientError> {
        self.transition(Phase::Starting);

        let session = context
            .sessions()
            .first()
            .cloned()
            .ok_or_else(|| FixClientError::NoSessions(context.name().to_string()))?;
        if context.sessions().len() > 1 {
            tracing::debug!(
                context = context.name(),
                session = %session.name,
                "Context has several sessions, using the first"
            );
        }
        let timeout = effective_timeout(self.timeout, context.initiator().socket_timeout);
        let settings = context.to_engine_settings(&session);

        let (app, channels) = ChannelApplication::new();
        let initiator = self
            .engine
            .initiate(app.clone(), settings, self.engine_logging)?;

        tracing::info!(
            context = context.name(),
            session = %session.label(),
            request = intent.kind(),
            request_id = intent.request_id(),
            "Starting session"
        );

        let result = self
            .drive(initiator.as_ref(), channels, &session, intent, timeout)
            .await;

        self.transition(Phase::ShuttingDown);
        app.stop();
        if let Err(e) = initiator.stop().await {
            tracing::warn!(error = %e, "Initiator stop failed");
        }
        self.transition(Phase::Terminated);

        result
    }

    async fn drive(
        &mut self,
        initiator: &dyn Initiator,
        mut channels: SessionChannels,
        session: &SessionDefinition,
        intent: &Intent,
        timeout: Duration,
    ) -> Result<Outcome, FixClientError> {
        initiator.start().await?;
        self.transition(Phase::AwaitingConnect);

        if !self.await_connect(&mut channels.connected, timeout).await? {
            return Ok(Outcome::Interrupted);
        }
        self.transition(Phase::Connected);

        self.transition(Phase::Sending);
        let msg = builder::build(intent, session)?;
        let seq = initiator
            .send(msg)
            .await
            .map_err(FixClientError::SendFailure)?;
        tracing::info!(
            msg_type = intent.msg_type(),
            request_id = intent.request_id(),
            seq,
            "Request sent"
        );

        self.transition(Phase::Streaming);
        let sent_seq = (seq > 0).then_some(seq);
        Ok(self.stream(&mut channels.from_app, intent, sent_seq).await)
    }

    /// Wait for Logon. `Ok(false)` means a shutdown signal arrived first.
    async fn await_connect(
        &self,
        connected: &mut mpsc::Receiver<()>,
        timeout: Duration,
    ) -> Result<bool, FixClientError> {
        tokio::select! {
            () = self.shutdown.cancelled() => {
                tracing::info!("Shutdown requested before logon");
                Ok(false)
            }
            res = tokio::time::timeout(timeout, connected.recv()) => match res {
                Ok(Some(())) => Ok(true),
                Ok(None) => Err(FixClientError::LogoutBeforeConnect),
                Err(_) => Err(FixClientError::ConnectionTimeout(timeout)),
            },
        }
    }

    async fn stream(
        &self,
        from_app: &mut mpsc::UnboundedReceiver<Message>,
        intent: &Intent,
        sent_seq: Option<u64>,
    ) -> Outcome {
        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    tracing::info!("Shutdown requested, stopping session");
                    return Outcome::Interrupted;
                }
                msg = from_app.recv() => {
                    let Some(msg) = msg else {
                        tracing::warn!(
                            request_id = intent.request_id(),
                            "Session closed before a terminal response"
                        );
                        return Outcome::SessionClosed;
                    };
                    self.sink.display(&msg);
                    if intent.classify(&msg, sent_seq) == ResponseMatch::Complete {
                        tracing::info!(
                            msg_type = msg.msg_type(),
                            request_id = intent.request_id(),
                            "Terminal response received"
                        );
                        return Outcome::Completed;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::application::ports::{
        Application, EngineError, EngineSettings, InitiatorSettings,
    };
    use crate::domain::dict::{Domain, resolve};
    use crate::domain::intent::{MarketDataIntent, MarketDataParams};
    use crate::domain::message::{tags, tags::msg_type};

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Behavior {
        /// Never logs on.
        Silent,
        /// Logs out during start.
        LogoutOnStart,
        /// Logs on; send fails.
        FailSend,
        /// Logs on; replies with a snapshot for the sent MDReqID.
        Snapshot,
        /// Logs on; replies with an incremental update, then nothing.
        Stream,
        /// Logs on; logs out right after the send.
        LogoutAfterSend,
        /// Logs on; rejects an earlier V frame, then sends a snapshot.
        StaleRejectThenSnapshot,
    }

    /// MsgSeqNum the fake initiator reports for the request.
    const SENT_SEQ: u64 = 2;

    #[derive(Default)]
    struct Calls {
        sent: Mutex<Vec<Message>>,
        stops: AtomicUsize,
    }

    struct FakeInitiator {
        behavior: Behavior,
        app: Arc<dyn Application>,
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl Initiator for FakeInitiator {
        async fn start(&self) -> Result<(), EngineError> {
            match self.behavior {
                Behavior::Silent => {}
                Behavior::LogoutOnStart => self.app.on_logout(),
                _ => self.app.on_logon(),
            }
            Ok(())
        }

        async fn stop(&self) -> Result<(), EngineError> {
            self.calls.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn send(&self, msg: Message) -> Result<u64, EngineError> {
            if self.behavior == Behavior::FailSend {
                return Err(EngineError::NotLoggedOn);
            }
            let req_id = msg.body.get(tags::MD_REQ_ID).unwrap_or_default().to_string();
            self.calls.sent.lock().push(msg);
            match self.behavior {
                Behavior::Snapshot => {
                    let mut reply = Message::new(msg_type::MARKET_DATA_SNAPSHOT);
                    reply.body.set(tags::MD_REQ_ID, req_id);
                    self.app.from_app(reply);
                }
                Behavior::Stream => {
                    let mut reply = Message::new(msg_type::MARKET_DATA_INCREMENTAL);
                    reply.body.set(tags::MD_REQ_ID, req_id);
                    self.app.from_app(reply);
                }
                Behavior::LogoutAfterSend => self.app.on_logout(),
                Behavior::StaleRejectThenSnapshot => {
                    let mut reject = Message::new(msg_type::REJECT);
                    reject
                        .body
                        .set(tags::REF_SEQ_NUM, "1")
                        .set(tags::REF_MSG_TYPE, msg_type::MARKET_DATA_REQUEST);
                    self.app.from_app(reject);
                    let mut reply = Message::new(msg_type::MARKET_DATA_SNAPSHOT);
                    reply.body.set(tags::MD_REQ_ID, req_id);
                    self.app.from_app(reply);
                }
                _ => {}
            }
            Ok(SENT_SEQ)
        }
    }

    struct FakeEngine {
        behavior: Behavior,
        calls: Arc<Calls>,
    }

    impl Engine for FakeEngine {
        fn initiate(
            &self,
            application: Arc<dyn Application>,
            _settings: EngineSettings,
            _engine_logging: bool,
        ) -> Result<Box<dyn Initiator>, EngineError> {
            Ok(Box::new(FakeInitiator {
                behavior: self.behavior,
                app: application,
                calls: self.calls.clone(),
            }))
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl MessageSink for RecordingSink {
        fn display(&self, msg: &Message) {
            self.0.lock().push(msg.msg_type().to_string());
        }
    }

    struct Context {
        sessions: Vec<SessionDefinition>,
        initiator: InitiatorSettings,
    }

    impl ConnectionContext for Context {
        fn name(&self) -> &str {
            "test"
        }
        fn sessions(&self) -> &[SessionDefinition] {
            &self.sessions
        }
        fn initiator(&self) -> &InitiatorSettings {
            &self.initiator
        }
    }

    fn context(begin_string: &str, appl_ver_id: &str) -> Context {
        Context {
            sessions: vec![SessionDefinition {
                name: "s1".to_string(),
                begin_string: begin_string.to_string(),
                default_appl_ver_id: appl_ver_id.to_string(),
                sender_comp_id: "CLIENT".to_string(),
                target_comp_id: "BROKER".to_string(),
                ..SessionDefinition::default()
            }],
            initiator: InitiatorSettings {
                name: "i1".to_string(),
                host: "127.0.0.1".to_string(),
                port: 9876,
                socket_timeout: Duration::ZERO,
                heartbeat_interval: Duration::from_secs(30),
                reconnect_interval: Duration::from_secs(1),
                max_reconnect_attempts: 1,
            },
        }
    }

    fn intent(sub_type: &str) -> Intent {
        MarketDataIntent::new(MarketDataParams {
            request_id: Some("md-1".to_string()),
            subscription_type: resolve(Domain::SubscriptionRequestType, sub_type).unwrap(),
            full_refresh: true,
            market_depth: 0,
            entry_types: vec![resolve(Domain::MdEntryType, "bid").unwrap()],
            symbols: vec!["EUR/USD".to_string()],
        })
        .unwrap()
        .into()
    }

    struct Harness {
        orchestrator: Orchestrator,
        calls: Arc<Calls>,
        sink: Arc<RecordingSink>,
        shutdown: CancellationToken,
    }

    fn harness(behavior: Behavior, timeout: Option<Duration>) -> Harness {
        let calls = Arc::new(Calls::default());
        let sink = Arc::new(RecordingSink::default());
        let shutdown = CancellationToken::new();
        let orchestrator = Orchestrator::new(
            Arc::new(FakeEngine {
                behavior,
                calls: calls.clone(),
            }),
            sink.clone(),
            shutdown.clone(),
            timeout,
            false,
        );
        Harness {
            orchestrator,
            calls,
            sink,
            shutdown,
        }
    }

    #[test]
    fn timeout_resolution_order() {
        let cli = Some(Duration::from_secs(2));
        let socket = Duration::from_secs(7);
        assert_eq!(effective_timeout(cli, socket), Duration::from_secs(2));
        assert_eq!(effective_timeout(None, socket), socket);
        assert_eq!(effective_timeout(Some(Duration::ZERO), socket), socket);
        assert_eq!(
            effective_timeout(Some(Duration::ZERO), Duration::ZERO),
            DEFAULT_CONNECT_TIMEOUT
        );
        assert_eq!(effective_timeout(None, Duration::ZERO), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn snapshot_completes_on_terminal_response() {
        let mut h = harness(Behavior::Snapshot, None);
        let outcome = h
            .orchestrator
            .run(&context("FIXT.1.1", "FIX.5.0SP2"), &intent("snapshot"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(h.calls.sent.lock().len(), 1);
        assert_eq!(h.sink.0.lock().as_slice(), ["W"]);
        assert_eq!(h.calls.stops.load(Ordering::SeqCst), 1);
        assert_eq!(h.orchestrator.phase(), Phase::Terminated);
    }

    #[tokio::test]
    async fn reject_of_another_frame_does_not_end_the_run() {
        let mut h = harness(Behavior::StaleRejectThenSnapshot, None);
        let outcome = h
            .orchestrator
            .run(&context("FIXT.1.1", "FIX.5.0SP2"), &intent("snapshot"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(h.sink.0.lock().as_slice(), ["3", "W"]);
    }

    #[tokio::test]
    async fn no_logon_times_out_without_sending() {
        let mut h = harness(Behavior::Silent, Some(Duration::from_millis(50)));
        let err = h
            .orchestrator
            .run(&context("FIXT.1.1", "FIX.5.0SP2"), &intent("snapshot"))
            .await
            .unwrap_err();

        assert!(matches!(err, FixClientError::ConnectionTimeout(d) if d == Duration::from_millis(50)));
        assert!(h.calls.sent.lock().is_empty());
        assert_eq!(h.calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn logout_before_logon_is_reported() {
        let mut h = harness(Behavior::LogoutOnStart, Some(Duration::from_secs(1)));
        let err = h
            .orchestrator
            .run(&context("FIXT.1.1", "FIX.5.0SP2"), &intent("snapshot"))
            .await
            .unwrap_err();

        assert!(matches!(err, FixClientError::LogoutBeforeConnect));
        assert!(h.calls.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn unsupported_version_never_sends() {
        let mut h = harness(Behavior::Snapshot, None);
        let err = h
            .orchestrator
            .run(&context("FIX.4.2", ""), &intent("snapshot"))
            .await
            .unwrap_err();

        assert!(matches!(err, FixClientError::UnsupportedProtocolVersion(_)));
        assert!(h.calls.sent.lock().is_empty());
        assert_eq!(h.calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn send_failure_propagates() {
        let mut h = harness(Behavior::FailSend, None);
        let err = h
            .orchestrator
            .run(&context("FIXT.1.1", "FIX.5.0SP2"), &intent("snapshot"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FixClientError::SendFailure(EngineError::NotLoggedOn)
        ));
    }

    #[tokio::test]
    async fn interrupt_while_streaming_is_clean() {
        let mut h = harness(Behavior::Stream, None);
        let shutdown = h.shutdown.clone();
        let sink = h.sink.clone();
        tokio::spawn(async move {
            // Cancel once the streamed update has been displayed.
            while sink.0.lock().is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            shutdown.cancel();
        });

        let outcome = h
            .orchestrator
            .run(
                &context("FIXT.1.1", "FIX.5.0SP2"),
                &intent("snapshot_and_updates"),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Interrupted);
        assert_eq!(h.sink.0.lock().as_slice(), ["X"]);
        assert_eq!(h.calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn channel_close_ends_stream() {
        let mut h = harness(Behavior::LogoutAfterSend, None);
        let outcome = h
            .orchestrator
            .run(&context("FIXT.1.1", "FIX.5.0SP2"), &intent("snapshot"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::SessionClosed);
        assert_eq!(h.calls.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn empty_context_is_a_config_error() {
        let mut h = harness(Behavior::Snapshot, None);
        let mut ctx = context("FIXT.1.1", "FIX.5.0SP2");
        ctx.sessions.clear();
        let err = h.orchestrator.run(&ctx, &intent("snapshot")).await.unwrap_err();
        assert!(matches!(&err, FixClientError::NoSessions(name) if name == "test"));
        assert_eq!(err.exit_code(), 78);
        assert_eq!(h.calls.stops.load(Ordering::SeqCst), 0);
    }
}
