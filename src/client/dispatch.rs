/// Session protocol state machine.
///
/// Decides how to react to every server message: what to send back, when to
/// start the heartbeat and when the session is over. It performs no I/O so
/// that the actor in `session.rs` only has to carry out the resulting [`Step`].

use std::time::Instant;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::client::error::ProtocolError;
use crate::client::messages::{IncomingMessage, MapUpdateEvent, OutgoingMessage};
use crate::config::game::TICK_LOG_INTERVAL;
use crate::game::types::{GameMode, GameSettings};
use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Connecting,
    AwaitingRegistration,
    AwaitingStart,
    InGame,
    Ended,
}

/// One thing the session must do, in order.
#[derive(Debug, PartialEq)]
pub enum Effect {
    Send(OutgoingMessage),
    StartHeartbeat,
}

/// What the session must do after handling one message.
#[derive(Debug, Default, PartialEq)]
pub struct Step {
    pub effects: Vec<Effect>,
    /// The session reached its terminal state.
    pub finished: bool,
}

impl Step {
    fn send(message: OutgoingMessage) -> Self {
        Self { effects: vec![Effect::Send(message)], finished: false }
    }

    fn finished() -> Self {
        Self { effects: Vec::new(), finished: true }
    }

    /// Messages to send, in order.
    pub fn outgoing(&self) -> impl Iterator<Item = &OutgoingMessage> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Send(message) => Some(message),
            Effect::StartHeartbeat => None,
        })
    }

    pub fn starts_heartbeat(&self) -> bool {
        self.effects.contains(&Effect::StartHeartbeat)
    }
}

pub struct SessionState {
    mode: GameMode,
    player_name: String,
    desired_settings: Option<GameSettings>,
    settings: GameSettings,
    player_id: Option<Uuid>,
    phase: SessionPhase,
}

impl SessionState {
    pub fn new(player_name: &str, mode: GameMode, desired_settings: Option<GameSettings>) -> Self {
        Self {
            mode,
            player_name: player_name.to_string(),
            desired_settings,
            settings: GameSettings::default(),
            player_id: None,
            phase: SessionPhase::Connecting,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Settings negotiated at registration (defaults until then).
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Player id assigned by the server at registration.
    pub fn player_id(&self) -> Option<Uuid> {
        self.player_id
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// Connection is open: register the player.
    pub fn on_connected(&mut self) -> OutgoingMessage {
        self.phase = SessionPhase::AwaitingRegistration;
        debug!("[Session] Registering player {}", self.player_name);
        OutgoingMessage::register_player(&self.player_name, self.desired_settings.clone())
    }

    /// Marks the session as over, e.g. after a fatal error.
    pub fn end(&mut self) {
        self.phase = SessionPhase::Ended;
    }

    /// Decodes and handles one text frame.
    pub fn handle_text<S: Strategy>(&mut self, text: &str, strategy: &mut S) -> Result<Step, ProtocolError> {
        debug!("[Session] Received: {}", text);
        let message = IncomingMessage::decode(text)?;
        self.handle(message, strategy)
    }

    pub fn handle<S: Strategy>(&mut self, message: IncomingMessage, strategy: &mut S) -> Result<Step, ProtocolError> {
        if self.is_ended() {
            warn!("[Session] Ignoring message received after the session ended");
            return Ok(Step::default());
        }

        match message {
            IncomingMessage::InvalidMessage(invalid) => {
                self.end();
                Err(ProtocolError::InvalidMessage(format!(
                    "{} (received: {})",
                    invalid.error_message, invalid.received_message
                )))
            }
            IncomingMessage::PlayerRegistered(registered) => {
                self.settings = registered.game_settings;
                self.player_id = registered.receiving_player_id;
                self.phase = SessionPhase::AwaitingStart;
                info!("[Session] Player registered as {} ({:?})", registered.name, self.player_id);
                Ok(Step {
                    effects: vec![
                        Effect::Send(OutgoingMessage::client_info(self.player_id)),
                        Effect::StartHeartbeat,
                        Effect::Send(OutgoingMessage::start_game()),
                    ],
                    finished: false,
                })
            }
            IncomingMessage::GameLink(link) => {
                info!("[Session] Game can be viewed at: {}", link.url);
                Ok(Step::default())
            }
            IncomingMessage::GameStarting(_) => {
                self.phase = SessionPhase::InGame;
                info!("[Session] Game started");
                Ok(Step::default())
            }
            IncomingMessage::MapUpdate(event) => {
                self.phase = SessionPhase::InGame;
                Ok(Step::send(self.answer_tick(&event, strategy)))
            }
            IncomingMessage::GameResult(result) => {
                info!("[Session] ### Game Results ###");
                for player in &result.player_ranks {
                    info!("[Session] {}: {} - {}", player.rank, player.player_name, player.points);
                }
                Ok(Step::default())
            }
            IncomingMessage::GameEnded(ended) => {
                if ended.player_winner_id.is_some() && ended.player_winner_id == ended.receiving_player_id {
                    info!("[Session] You won the game");
                } else {
                    info!("[Session] Game ended, winner: {}", ended.player_winner_name);
                }
                match self.mode {
                    GameMode::Training => {
                        self.end();
                        Ok(Step::finished())
                    }
                    GameMode::Tournament => {
                        self.phase = SessionPhase::AwaitingStart;
                        Ok(Step::default())
                    }
                }
            }
            IncomingMessage::TournamentEnded(ended) => {
                info!("[Session] ### Tournament Ended ###");
                for player in &ended.game_result {
                    info!("[Session] {} - {}", player.name, player.points);
                }
                self.end();
                Ok(Step::finished())
            }
            IncomingMessage::HeartBeatResponse(_) => Ok(Step::default()),
        }
    }

    /// Runs the strategy on one snapshot. Its duration is on the tick's critical path.
    fn answer_tick<S: Strategy>(&self, event: &MapUpdateEvent, strategy: &mut S) -> OutgoingMessage {
        if event.game_tick % TICK_LOG_INTERVAL == 0 {
            info!("[Session] Game tick: {}/{}", event.game_tick, self.settings.total_ticks());
        }

        let started = Instant::now();
        let action = strategy.calculate_move(&self.settings, event);
        let elapsed = started.elapsed();

        if self.settings.time_in_ms_per_tick > 0 && elapsed.as_millis() >= self.settings.time_in_ms_per_tick as u128 {
            warn!(
                "[Session] Decision for tick {} took {}ms, tick duration is {}ms",
                event.game_tick,
                elapsed.as_millis(),
                self.settings.time_in_ms_per_tick
            );
        }
        info!("[Session] [{:<3}ms] Action: {}", elapsed.as_millis(), action);

        OutgoingMessage::register_move(event, action)
    }
}
