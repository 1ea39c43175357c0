use std::sync::Arc;
use std::time::Duration;

use danmaku_protocol::{ChatMessage, ClientFrame, parse_server_frame};
use futures_util::{Sink, Stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::buffer::Buffer;
use crate::config::SessionConfig;
use crate::connection;
use crate::error::{ClientError, Result};
use crate::room::{RoomInfo, RoomResolver};
use crate::sender::FrameSender;
use crate::state::SessionState;

/// A live connection to one chat room.
///
/// Construction spawns the connection task immediately; chat messages show
/// up in [`Session::buffer`] as they are decoded. Must be created inside a
/// tokio runtime.
///
/// Dropping the session stops it, just like [`Session::stop`].
pub struct Session {
    room_id: String,
    config: SessionConfig,
    buffer: Buffer,
    done: watch::Sender<bool>,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<Result<()>>,
}

impl Session {
    /// Resolve `room_id`, connect to its first chat server and log in
    pub fn start(room_id: impl Into<String>, config: SessionConfig) -> Self {
        Self::start_with_buffer(room_id.into(), config, Buffer::new())
    }

    fn start_with_buffer(room_id: String, config: SessionConfig, buffer: Buffer) -> Self {
        let (done, ctx, state) = Context::new(buffer.clone());
        let task = tokio::spawn(establish(room_id.clone(), config.clone(), ctx));

        Self {
            room_id,
            config,
            buffer,
            done,
            state,
            task,
        }
    }

    /// Run a session over an already-open transport, skipping room lookup
    /// and connect.
    pub fn from_transport<Si, St>(
        room_id: impl Into<String>,
        info: RoomInfo,
        config: SessionConfig,
        sink: Si,
        stream: St,
    ) -> Self
    where
        Si: Sink<Message, Error = WsError> + Send + 'static,
        St: Stream<Item = std::result::Result<Message, WsError>> + Send + 'static,
    {
        let buffer = Buffer::new();
        let (done, ctx, state) = Context::new(buffer.clone());
        ctx.set_state(SessionState::Connecting);

        let task_config = config.clone();
        let task = tokio::spawn(async move {
            let result = run(&info, &task_config, &ctx, sink, stream).await;
            ctx.finish(&result);
            result
        });

        Self {
            room_id: room_id.into(),
            config,
            buffer,
            done,
            state,
            task,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Oldest undelivered chat message, if any
    pub fn pop(&self) -> Option<ChatMessage> {
        self.buffer.pop_front()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Stop heartbeats and frame processing and close the socket
    pub fn stop(&self) {
        self.done.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.done.borrow()
    }

    /// Stop this session and start a fresh one for the same room.
    ///
    /// The new session appends to the same buffer.
    pub fn restart(self) -> Self {
        self.stop();
        tracing::info!(room_id = %self.room_id, "Restarting session");
        Self::start_with_buffer(
            self.room_id.clone(),
            self.config.clone(),
            self.buffer.clone(),
        )
    }

    /// Wait for the session to end, returning the error that ended it
    pub async fn join(self) -> Result<()> {
        let Self { task, done, .. } = self;
        let result = task.await;
        drop(done);

        match result {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Ok(()),
        }
    }
}

/// What the background tasks share with the session handle
struct Context {
    buffer: Buffer,
    done: watch::Receiver<bool>,
    state: Arc<watch::Sender<SessionState>>,
}

impl Context {
    fn new(buffer: Buffer) -> (watch::Sender<bool>, Self, watch::Receiver<SessionState>) {
        let (done_tx, done_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let ctx = Self {
            buffer,
            done: done_rx,
            state: Arc::new(state_tx),
        };
        (done_tx, ctx, state_rx)
    }

    fn set_state(&self, state: SessionState) {
        tracing::debug!(?state, "Session state");
        self.state.send_replace(state);
    }

    // A dropped session handle counts as stopped.
    fn is_done(&self) -> bool {
        *self.done.borrow() || self.done.has_changed().is_err()
    }

    fn finish(&self, result: &Result<()>) {
        match result {
            Ok(()) => self.set_state(SessionState::Closed),
            Err(e) => {
                tracing::error!(error = %e, "Session failed");
                self.set_state(SessionState::Error);
            }
        }
    }
}

async fn establish(room_id: String, config: SessionConfig, ctx: Context) -> Result<()> {
    let result = resolve_and_run(&room_id, &config, &ctx).await;
    ctx.finish(&result);
    result
}

async fn resolve_and_run(room_id: &str, config: &SessionConfig, ctx: &Context) -> Result<()> {
    ctx.set_state(SessionState::Resolving);
    let info = RoomResolver::new(config).resolve(room_id).await?;
    if ctx.is_done() {
        return Ok(());
    }

    let addr = info
        .primary_addr()
        .ok_or_else(|| ClientError::Protocol("no chat server address".to_string()))?
        .to_string();

    ctx.set_state(SessionState::Connecting);
    tracing::info!(room_id, addr = %addr, "Connecting to chat server");
    let ws = connection::connect(&addr, &config.origin).await?;
    if ctx.is_done() {
        return Ok(());
    }

    let (sink, stream) = ws.split();
    run(&info, config, ctx, sink, stream).await
}

/// Log in, start heartbeats and process inbound frames until stopped or
/// the server goes away.
async fn run<Si, St>(
    info: &RoomInfo,
    config: &SessionConfig,
    ctx: &Context,
    sink: Si,
    stream: St,
) -> Result<()>
where
    Si: Sink<Message, Error = WsError> + Send + 'static,
    St: Stream<Item = std::result::Result<Message, WsError>>,
{
    let (sender, writer) = FrameSender::spawn(sink);

    sender.send_frame(&ClientFrame::Login(info.login_request(config)))?;
    ctx.set_state(SessionState::LoggedIn);

    let heartbeat = tokio::spawn(heartbeat_loop(
        sender.clone(),
        config.heartbeat_interval,
        ctx.done.clone(),
    ));
    ctx.set_state(SessionState::Heartbeating);

    let result = receive_loop(stream, &sender, ctx).await;

    let _ = sender.close();
    drop(sender);
    let _ = writer.await;
    heartbeat.abort();

    result
}

async fn receive_loop<St>(stream: St, sender: &FrameSender, ctx: &Context) -> Result<()>
where
    St: Stream<Item = std::result::Result<Message, WsError>>,
{
    tokio::pin!(stream);
    let mut done = ctx.done.clone();

    loop {
        let message = tokio::select! {
            biased;
            _ = done.wait_for(|stopped| *stopped) => return Ok(()),
            message = stream.next() => message,
        };

        match message {
            Some(Ok(Message::Binary(bytes))) => handle_inbound(&bytes, &ctx.buffer),
            Some(Ok(Message::Ping(data))) => sender.send_message(Message::Pong(data))?,
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(?frame, "Chat server closed the connection");
                return Ok(());
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => {
                tracing::info!("Chat server connection ended");
                return Ok(());
            }
        }
    }
}

/// Decode one binary message and queue any chat it carries. Bad frames are
/// logged and dropped.
fn handle_inbound(bytes: &[u8], buffer: &Buffer) {
    match parse_server_frame(bytes) {
        Ok(Some(frame)) => {
            for e in &frame.rejected {
                tracing::debug!(error = %e, "Dropped chat candidate");
            }
            if frame.is_data() {
                tracing::debug!(messages = frame.messages.len(), "Decoded data frame");
            }
            for message in frame.messages {
                buffer.push(message);
            }
        }
        Ok(None) => tracing::trace!(len = bytes.len(), "Ignoring short frame"),
        Err(e) => tracing::warn!(error = %e, "Dropping undecodable frame"),
    }
}

async fn heartbeat_loop(sender: FrameSender, interval: Duration, mut done: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            biased;
            _ = done.wait_for(|stopped| *stopped) => break,
            _ = tokio::time::sleep(interval) => {}
        }

        if sender.send_frame(&ClientFrame::Heartbeat).is_err() {
            break;
        }
        tracing::trace!("Heartbeat sent");
    }
}
