/// Websocket session with the game server.
///
/// This actor owns the connection: the read half is registered as its stream
/// and the write half is wrapped in a `SinkWrite`, so every outgoing frame
/// (moves and heartbeats alike) is written from the actor's context, one at a
/// time. Protocol decisions are delegated to [`SessionState`].
use actix::io::{SinkWrite, WriteHandler};
use actix::prelude::*;
use futures_util::stream::{SplitSink, StreamExt};
use log::{error, info, warn};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::dispatch::{Effect, SessionState, Step};
use super::error::SessionError;
use super::heartbeat::{Heartbeat, KeepAlive};
use super::messages::OutgoingMessage;
use crate::config::connection::SessionConfig;
use crate::game::types::{GameMode, GameSettings};
use crate::strategy::Strategy;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Represents the player's connection to the game server.
pub struct PaintSession<S: Strategy + Unpin + 'static> {
    state: SessionState,
    strategy: S,
    sink: SinkWrite<Message, WsSink>,
    heartbeat: Heartbeat,
    result: Option<Result<(), SessionError>>,
    done: Option<oneshot::Sender<Result<(), SessionError>>>,
}

/// Connects with the default configuration and plays until the session ends.
///
/// Training sessions end after one game, tournament sessions when the
/// tournament ends. Fatal protocol or connection errors are returned.
pub async fn start<S>(
    player_name: &str,
    mode: GameMode,
    desired_settings: Option<GameSettings>,
    strategy: S,
) -> Result<(), SessionError>
where
    S: Strategy + Unpin + 'static,
{
    start_with_config(&SessionConfig::default(), player_name, mode, desired_settings, strategy).await
}

/// Same as [`start`] against an explicit server and heartbeat interval.
pub async fn start_with_config<S>(
    config: &SessionConfig,
    player_name: &str,
    mode: GameMode,
    desired_settings: Option<GameSettings>,
    strategy: S,
) -> Result<(), SessionError>
where
    S: Strategy + Unpin + 'static,
{
    let url = format!("{}{}", config.server_base_url, mode.path());
    info!("[Session] Connecting to {}", url);
    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|source| SessionError::Connect { url: url.clone(), source })?;
    info!("[Session] Connected to {}", url);

    let (sink, stream) = ws_stream.split();
    let (done_tx, done_rx) = oneshot::channel();
    let state = SessionState::new(player_name, mode, desired_settings);
    let heartbeat = Heartbeat::new(config.heartbeat_interval);

    PaintSession::create(move |ctx| {
        PaintSession::add_stream(stream, ctx);
        PaintSession {
            state,
            strategy,
            sink: SinkWrite::new(sink, ctx),
            heartbeat,
            result: None,
            done: Some(done_tx),
        }
    });

    done_rx.await.unwrap_or(Err(SessionError::Aborted))
}

impl<S: Strategy + Unpin + 'static> PaintSession<S> {
    fn send(&mut self, message: OutgoingMessage, ctx: &mut Context<Self>) {
        let text = match message.encode() {
            Ok(text) => text,
            Err(e) => {
                self.fail(e.into(), ctx);
                return;
            }
        };
        log::debug!("[Session] Sending: {}", text);
        if self.sink.write(Message::text(text)).is_err() {
            self.fail(SessionError::ConnectionClosed, ctx);
        }
    }

    fn on_text(&mut self, text: &str, ctx: &mut Context<Self>) {
        match self.state.handle_text(text, &mut self.strategy) {
            Ok(step) => self.apply(step, ctx),
            Err(e) => self.fail(e.into(), ctx),
        }
    }

    fn apply(&mut self, step: Step, ctx: &mut Context<Self>) {
        for effect in step.effects {
            match effect {
                Effect::Send(message) => self.send(message, ctx),
                Effect::StartHeartbeat => {
                    let player_id = self.state.player_id();
                    Heartbeat::start(self, ctx, player_id);
                }
            }
            if self.result.is_some() {
                // A write failed, the session is already stopping.
                return;
            }
        }
        if step.finished {
            self.finish(ctx);
        }
    }

    /// Terminal event received: stop heartbeat, close the connection.
    fn finish(&mut self, ctx: &mut Context<Self>) {
        info!("[Session] Session ended");
        self.result.get_or_insert(Ok(()));
        self.shutdown(ctx);
    }

    /// Fatal error: report it and stop without trying to recover.
    fn fail(&mut self, err: SessionError, ctx: &mut Context<Self>) {
        if self.result.is_none() {
            error!("[Session] {}", err);
            self.result = Some(Err(err));
        }
        self.shutdown(ctx);
    }

    fn shutdown(&mut self, ctx: &mut Context<Self>) {
        self.state.end();
        Heartbeat::stop(self, ctx);
        self.sink.close();
        ctx.stop();
    }
}

impl<S: Strategy + Unpin + 'static> Actor for PaintSession<S> {
    type Context = Context<Self>;

    /// Called once connected. Registers the player.
    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[Session] Joining {:?} matchmaking", self.state.mode());
        let register = self.state.on_connected();
        self.send(register, ctx);
    }

    /// Called when the session stops. Hands the outcome back to [`start`].
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let result = self.result.take().unwrap_or(Err(SessionError::Aborted));
        if let Some(done) = self.done.take() {
            // The caller may have gone away; nothing left to report to.
            let _ = done.send(result);
        }
    }
}

impl<S: Strategy + Unpin + 'static> KeepAlive for PaintSession<S> {
    fn heartbeat(&mut self) -> &mut Heartbeat {
        &mut self.heartbeat
    }

    fn send_keep_alive(&mut self, message: OutgoingMessage, ctx: &mut Context<Self>) {
        self.send(message, ctx);
    }
}

impl<S: Strategy + Unpin + 'static> StreamHandler<Result<Message, tungstenite::Error>> for PaintSession<S> {
    /// Handles incoming frames from the server.
    fn handle(&mut self, msg: Result<Message, tungstenite::Error>, ctx: &mut Self::Context) {
        match msg {
            Ok(Message::Text(text)) => self.on_text(text.as_str(), ctx),
            Ok(Message::Close(frame)) => {
                info!("[Session] Server closed the connection: {:?}", frame);
                if !self.state.is_ended() {
                    self.fail(SessionError::ConnectionClosed, ctx);
                }
            }
            Ok(Message::Binary(_)) => warn!("[Session] Ignoring binary frame"),
            // Pings are answered by tungstenite.
            Ok(_) => (),
            Err(e) => self.fail(SessionError::Connection(e), ctx),
        }
    }

    /// Called when the server side of the stream ends.
    fn finished(&mut self, ctx: &mut Self::Context) {
        if self.state.is_ended() {
            ctx.stop();
        } else {
            self.fail(SessionError::ConnectionClosed, ctx);
        }
    }
}

impl<S: Strategy + Unpin + 'static> WriteHandler<tungstenite::Error> for PaintSession<S> {
    fn error(&mut self, err: tungstenite::Error, ctx: &mut Self::Context) -> Running {
        if self.state.is_ended() {
            // Closing after the last message; the outcome is already known.
            return Running::Stop;
        }
        self.fail(SessionError::Connection(err), ctx);
        Running::Stop
    }
}
