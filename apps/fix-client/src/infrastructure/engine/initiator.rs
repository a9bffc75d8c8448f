//! Socket Initiator
//!
//! TCP implementation of the [`Engine`] and [`Initiator`] ports. One
//! background task per session owns the socket, the session layer and the
//! heartbeat monitor; the initiator handle talks to it over a command
//! channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;

use super::codec::{FixCodec, FixCodecError};
use super::heartbeat::{HeartbeatConfig, HeartbeatEvent, HeartbeatMonitor, HeartbeatState};
use super::reconnect::{ReconnectConfig, ReconnectPolicy};
use super::session::{FixSession, SessionEvent, SessionState};
use crate::application::ports::{Application, Engine, EngineError, EngineSettings, Initiator};
use crate::domain::message::Message;

/// How long `stop` waits for the Logout reply.
const LOGOUT_WAIT: Duration = Duration::from_secs(1);

/// Tracing target for frame logging.
pub const WIRE_TARGET: &str = "fix_client::wire";

impl From<FixCodecError> for EngineError {
    fn from(err: FixCodecError) -> Self {
        match err {
            FixCodecError::Io(e) => Self::Io(e),
            other => Self::Codec(other.to_string()),
        }
    }
}

/// Engine that opens plain TCP initiator sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SocketEngine;

impl SocketEngine {
    /// Create an engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Engine for SocketEngine {
    fn initiate(
        &self,
        application: Arc<dyn Application>,
        settings: EngineSettings,
        engine_logging: bool,
    ) -> Result<Box<dyn Initiator>, EngineError> {
        validate(&settings)?;
        Ok(Box::new(SocketInitiator::new(
            application,
            settings,
            engine_logging,
        )))
    }
}

fn validate(settings: &EngineSettings) -> Result<(), EngineError> {
    let initiator = &settings.initiator;
    let session = &settings.session;
    let problem = if initiator.host.is_empty() {
        Some("no host")
    } else if initiator.port == 0 {
        Some("no port")
    } else if initiator.heartbeat_interval.is_zero() {
        Some("heartbeat interval is zero")
    } else if session.begin_string.is_empty() {
        Some("no BeginString")
    } else if session.sender_comp_id.is_empty() || session.target_comp_id.is_empty() {
        Some("SenderCompID and TargetCompID are required")
    } else {
        None
    };
    match problem {
        Some(p) => Err(EngineError::InvalidSettings(format!(
            "session '{}': {p}",
            session.name
        ))),
        None => Ok(()),
    }
}

enum Command {
    /// Write a message; the socket write result is reported back.
    Send(Message, oneshot::Sender<Result<u64, EngineError>>),
    Logout,
}

struct Running {
    commands: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

/// Handle to one initiator session.
pub struct SocketInitiator {
    application: Arc<dyn Application>,
    settings: EngineSettings,
    engine_logging: bool,
    logged_on: Arc<AtomicBool>,
    cancel: CancellationToken,
    running: Mutex<Option<Running>>,
    started: AtomicBool,
}

impl SocketInitiator {
    /// Create a stopped initiator.
    #[must_use]
    pub fn new(
        application: Arc<dyn Application>,
        settings: EngineSettings,
        engine_logging: bool,
    ) -> Self {
        Self {
            application,
            settings,
            engine_logging,
            logged_on: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
            running: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    fn commands(&self) -> Option<mpsc::Sender<Command>> {
        self.running.lock().as_ref().map(|r| r.commands.clone())
    }
}

#[async_trait]
impl Initiator for SocketInitiator {
    async fn start(&self) -> Result<(), EngineError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(EngineError::AlreadyStarted);
        }

        let (commands, rx) = mpsc::channel(64);
        let task = ConnectionTask {
            application: Arc::clone(&self.application),
            settings: self.settings.clone(),
            engine_logging: self.engine_logging,
            logged_on: Arc::clone(&self.logged_on),
            cancel: self.cancel.clone(),
            commands: rx,
        };
        let handle = tokio::spawn(task.run());
        *self.running.lock() = Some(Running { commands, handle });

        tracing::info!(
            host = %self.settings.initiator.host,
            port = self.settings.initiator.port,
            session = %self.settings.session.label(),
            "Initiator started"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), EngineError> {
        let Some(Running {
            commands,
            mut handle,
        }) = self.running.lock().take()
        else {
            return Ok(());
        };

        if self.logged_on.load(Ordering::SeqCst) && commands.send(Command::Logout).await.is_ok() {
            if tokio::time::timeout(LOGOUT_WAIT, &mut handle).await.is_err() {
                tracing::debug!("No Logout reply, closing connection");
            } else {
                self.cancel.cancel();
                tracing::info!("Initiator stopped");
                return Ok(());
            }
        }

        self.cancel.cancel();
        if let Err(e) = handle.await
            && !e.is_cancelled()
        {
            tracing::warn!(error = %e, "Connection task failed");
        }
        tracing::info!("Initiator stopped");
        Ok(())
    }

    async fn send(&self, msg: Message) -> Result<u64, EngineError> {
        if !self.logged_on.load(Ordering::SeqCst) {
            return Err(EngineError::NotLoggedOn);
        }
        let commands = self.commands().ok_or(EngineError::Stopped)?;
        let (ack, written) = oneshot::channel();
        commands
            .send(Command::Send(msg, ack))
            .await
            .map_err(|_| EngineError::Stopped)?;
        written.await.map_err(|_| EngineError::Stopped)?
    }
}

/// Background task owning the socket.
struct ConnectionTask {
    application: Arc<dyn Application>,
    settings: EngineSettings,
    engine_logging: bool,
    logged_on: Arc<AtomicBool>,
    cancel: CancellationToken,
    commands: mpsc::Receiver<Command>,
}

impl ConnectionTask {
    async fn run(mut self) {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::from_initiator_settings(
            &self.settings.initiator,
        ));

        loop {
            match self.connect().await {
                Ok(stream) => {
                    if let Err(e) = self.run_session(stream).await {
                        tracing::warn!(error = %e, "Session ended with error");
                    }
                    break;
                }
                Err(e) => {
                    let Some(delay) = policy.next_delay() else {
                        let err = EngineError::ReconnectExhausted(policy.attempt_count() + 1);
                        tracing::error!(error = %e, "{err}");
                        break;
                    };
                    tracing::warn!(
                        error = %e,
                        attempt = policy.attempt_count(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Connection failed, retrying"
                    );
                    tokio::select! {
                        () = self.cancel.cancelled() => break,
                        cmd = self.commands.recv() => {
                            if matches!(cmd, None | Some(Command::Logout)) {
                                break;
                            }
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        self.logged_on.store(false, Ordering::SeqCst);
        self.application.on_logout();
    }

    async fn connect(&self) -> Result<TcpStream, EngineError> {
        let initiator = &self.settings.initiator;
        let addr = (initiator.host.as_str(), initiator.port);
        let stream = if initiator.socket_timeout.is_zero() {
            TcpStream::connect(addr).await?
        } else {
            tokio::time::timeout(initiator.socket_timeout, TcpStream::connect(addr))
                .await
                .map_err(|_| {
                    std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out")
                })??
        };
        stream.set_nodelay(true)?;
        tracing::info!(host = %initiator.host, port = initiator.port, "Connected");
        Ok(stream)
    }

    async fn run_session(&mut self, stream: TcpStream) -> Result<(), EngineError> {
        let mut conn = Connection {
            framed: Framed::new(stream, FixCodec::new()),
            session: FixSession::new(
                self.settings.session.clone(),
                self.settings.initiator.heartbeat_interval,
            ),
            heartbeat: Arc::new(HeartbeatState::new()),
            engine_logging: self.engine_logging,
        };

        let (hb_tx, mut hb_rx) = mpsc::channel(8);
        let hb_cancel = self.cancel.child_token();
        tokio::spawn(
            HeartbeatMonitor::new(
                HeartbeatConfig::from_interval(self.settings.initiator.heartbeat_interval),
                Arc::clone(&conn.heartbeat),
                hb_tx,
                hb_cancel.clone(),
            )
            .run(),
        );

        let result = self.session_loop(&mut conn, &mut hb_rx).await;
        hb_cancel.cancel();
        result
    }

    async fn session_loop(
        &mut self,
        conn: &mut Connection,
        hb_rx: &mut mpsc::Receiver<HeartbeatEvent>,
    ) -> Result<(), EngineError> {
        let logon = conn.session.logon();
        conn.write(logon).await?;
        let mut commands_open = true;

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => return Ok(()),
                frame = conn.framed.next() => {
                    let msg = match frame {
                        Some(Ok(msg)) => msg,
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            tracing::info!("Connection closed by counterparty");
                            return Ok(());
                        }
                    };
                    conn.heartbeat.record_received();
                    conn.trace("in", &msg);
                    if !self.handle_inbound(conn, msg).await? {
                        return Ok(());
                    }
                }
                cmd = self.commands.recv(), if commands_open => {
                    let logout_requested = match cmd {
                        Some(Command::Send(msg, ack)) => {
                            let msg = conn.session.prepare(msg);
                            let seq = msg.seq_num().unwrap_or_default();
                            match conn.write(msg).await {
                                Ok(()) => {
                                    let _ = ack.send(Ok(seq));
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, "Application message write failed");
                                    let _ = ack.send(Err(e));
                                    return Ok(());
                                }
                            }
                            false
                        }
                        Some(Command::Logout) => true,
                        None => {
                            commands_open = false;
                            true
                        }
                    };
                    if logout_requested {
                        match conn.session.state() {
                            SessionState::Active => {
                                let logout = conn.session.logout(None);
                                conn.write(logout).await?;
                            }
                            SessionState::LogoutSent => {}
                            SessionState::Disconnected | SessionState::LogonSent => return Ok(()),
                        }
                    }
                }
                Some(event) = hb_rx.recv() => match event {
                    HeartbeatEvent::SendHeartbeat => {
                        let hb = conn.session.heartbeat(None);
                        conn.write(hb).await?;
                    }
                    HeartbeatEvent::SendTestRequest => {
                        let req = conn.session.test_request();
                        conn.write(req).await?;
                    }
                    HeartbeatEvent::Timeout => {
                        tracing::warn!("Counterparty unresponsive, dropping connection");
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Returns `false` when the connection should close.
    async fn handle_inbound(
        &self,
        conn: &mut Connection,
        msg: Message,
    ) -> Result<bool, EngineError> {
        for event in conn.session.on_message(msg) {
            match event {
                SessionEvent::Send(reply) => conn.write(reply).await?,
                SessionEvent::LoggedOn => {
                    tracing::info!(session = %self.settings.session.label(), "Logged on");
                    self.logged_on.store(true, Ordering::SeqCst);
                    self.application.on_logon();
                }
                SessionEvent::Deliver(app_msg) => self.application.from_app(app_msg),
                SessionEvent::LoggedOut => {
                    tracing::info!(session = %self.settings.session.label(), "Logged out");
                    return Ok(false);
                }
                SessionEvent::Disconnect(reason) => {
                    let logout = conn.session.logout(Some(&reason));
                    let _ = conn.write(logout).await;
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

/// Socket plus per-connection session state.
struct Connection {
    framed: Framed<TcpStream, FixCodec>,
    session: FixSession,
    heartbeat: Arc<HeartbeatState>,
    engine_logging: bool,
}

impl Connection {
    async fn write(&mut self, msg: Message) -> Result<(), EngineError> {
        self.trace("out", &msg);
        self.framed.send(msg).await?;
        self.heartbeat.record_sent();
        Ok(())
    }

    fn trace(&self, direction: &str, msg: &Message) {
        if self.engine_logging {
            tracing::debug!(target: WIRE_TARGET, direction, "{msg}");
        }
    }
}
