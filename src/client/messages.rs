//! Wire messages exchanged with the game server.
//!
//! Every frame is a JSON object tagged by a fully qualified `type` string.
//! Decoding reads the tag first so that an unknown message type can be told
//! apart from a malformed one.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Serialize, Deserialize};
use serde_json::Value;
use uuid::Uuid;

use crate::client::error::ProtocolError;
use crate::config::client::{CLIENT_VERSION, LANGUAGE, LANGUAGE_VERSION};
use crate::game::state::Map;
use crate::game::types::{Action, GameSettings};

pub const INVALID_MESSAGE: &str = "se.cygni.paintbot.api.exception.InvalidMessage";
pub const PLAYER_REGISTERED: &str = "se.cygni.paintbot.api.response.PlayerRegistered";
pub const GAME_LINK_EVENT: &str = "se.cygni.paintbot.api.event.GameLinkEvent";
pub const GAME_STARTING_EVENT: &str = "se.cygni.paintbot.api.event.GameStartingEvent";
pub const MAP_UPDATE_EVENT: &str = "se.cygni.paintbot.api.event.MapUpdateEvent";
pub const GAME_RESULT_EVENT: &str = "se.cygni.paintbot.api.event.GameResultEvent";
pub const GAME_ENDED_EVENT: &str = "se.cygni.paintbot.api.event.GameEndedEvent";
pub const TOURNAMENT_ENDED_EVENT: &str = "se.cygni.paintbot.api.event.TournamentEndedEvent";
pub const HEART_BEAT_RESPONSE: &str = "se.cygni.paintbot.api.response.HeartBeatResponse";

pub const REGISTER_PLAYER: &str = "se.cygni.paintbot.api.request.RegisterPlayer";
pub const CLIENT_INFO: &str = "se.cygni.paintbot.api.request.ClientInfo";
pub const START_GAME: &str = "se.cygni.paintbot.api.request.StartGame";
pub const REGISTER_MOVE: &str = "se.cygni.paintbot.api.request.RegisterMove";
pub const HEART_BEAT_REQUEST: &str = "se.cygni.paintbot.api.request.HeartBeatRequest";

const INCOMING_TYPES: [&str; 9] = [
    INVALID_MESSAGE,
    PLAYER_REGISTERED,
    GAME_LINK_EVENT,
    GAME_STARTING_EVENT,
    MAP_UPDATE_EVENT,
    GAME_RESULT_EVENT,
    GAME_ENDED_EVENT,
    TOURNAMENT_ENDED_EVENT,
    HEART_BEAT_RESPONSE,
];

/// Milliseconds since the Unix epoch, as stamped on outgoing messages.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// Server -> client

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum IncomingMessage {
    #[serde(rename = "se.cygni.paintbot.api.exception.InvalidMessage")]
    InvalidMessage(InvalidMessage),
    #[serde(rename = "se.cygni.paintbot.api.response.PlayerRegistered")]
    PlayerRegistered(PlayerRegistered),
    #[serde(rename = "se.cygni.paintbot.api.event.GameLinkEvent")]
    GameLink(GameLinkEvent),
    #[serde(rename = "se.cygni.paintbot.api.event.GameStartingEvent")]
    GameStarting(GameStartingEvent),
    #[serde(rename = "se.cygni.paintbot.api.event.MapUpdateEvent")]
    MapUpdate(MapUpdateEvent),
    #[serde(rename = "se.cygni.paintbot.api.event.GameResultEvent")]
    GameResult(GameResultEvent),
    #[serde(rename = "se.cygni.paintbot.api.event.GameEndedEvent")]
    GameEnded(GameEndedEvent),
    #[serde(rename = "se.cygni.paintbot.api.event.TournamentEndedEvent")]
    TournamentEnded(TournamentEndedEvent),
    #[serde(rename = "se.cygni.paintbot.api.response.HeartBeatResponse")]
    HeartBeatResponse(HeartBeatResponse),
}

impl IncomingMessage {
    /// Decodes one text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        let message_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::Malformed("missing message type".to_string()))?;
        if !INCOMING_TYPES.contains(&message_type) {
            return Err(ProtocolError::UnknownType(message_type.to_string()));
        }
        serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Player id the server addressed this message to, if any.
    pub fn receiving_player_id(&self) -> Option<Uuid> {
        match self {
            IncomingMessage::InvalidMessage(m) => m.receiving_player_id,
            IncomingMessage::PlayerRegistered(m) => m.receiving_player_id,
            IncomingMessage::GameLink(m) => m.receiving_player_id,
            IncomingMessage::GameStarting(m) => m.receiving_player_id,
            IncomingMessage::MapUpdate(m) => m.receiving_player_id,
            IncomingMessage::GameResult(m) => m.receiving_player_id,
            IncomingMessage::GameEnded(m) => m.receiving_player_id,
            IncomingMessage::TournamentEnded(m) => m.receiving_player_id,
            IncomingMessage::HeartBeatResponse(m) => m.receiving_player_id,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvalidMessage {
    pub receiving_player_id: Option<Uuid>,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub received_message: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRegistered {
    pub receiving_player_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub game_settings: GameSettings,
    #[serde(default)]
    pub game_mode: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameLinkEvent {
    pub receiving_player_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
    #[serde(default)]
    pub url: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStartingEvent {
    pub receiving_player_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
    #[serde(default)]
    pub noof_players: u32,
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub height: usize,
}

/// Tick snapshot. One per tick, answered by exactly one move.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapUpdateEvent {
    pub receiving_player_id: Option<Uuid>,
    pub game_id: Uuid,
    pub game_tick: u32,
    pub map: Map,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRank {
    #[serde(default)]
    pub player_name: String,
    pub player_id: Option<Uuid>,
    pub rank: u32,
    pub points: i32,
    #[serde(default)]
    pub alive: bool,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameResultEvent {
    pub receiving_player_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
    #[serde(default)]
    pub player_ranks: Vec<PlayerRank>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameEndedEvent {
    pub receiving_player_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
    pub player_winner_id: Option<Uuid>,
    #[serde(default)]
    pub player_winner_name: String,
    #[serde(default)]
    pub game_tick: u32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPoints {
    #[serde(default)]
    pub name: String,
    pub player_id: Option<Uuid>,
    pub points: i32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentEndedEvent {
    pub receiving_player_id: Option<Uuid>,
    pub player_winner_id: Option<Uuid>,
    #[serde(default)]
    pub game_result: Vec<PlayerPoints>,
    #[serde(default)]
    pub tournament_name: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeartBeatResponse {
    pub receiving_player_id: Option<Uuid>,
}

// Client -> server

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    #[serde(rename = "se.cygni.paintbot.api.request.RegisterPlayer", rename_all = "camelCase")]
    RegisterPlayer {
        player_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        game_settings: Option<GameSettings>,
        receiving_player_id: Option<Uuid>,
        timestamp: u64,
    },
    #[serde(rename = "se.cygni.paintbot.api.request.ClientInfo", rename_all = "camelCase")]
    ClientInfo {
        language: String,
        language_version: String,
        operating_system: String,
        operating_system_version: String,
        client_version: String,
        receiving_player_id: Option<Uuid>,
        timestamp: u64,
    },
    #[serde(rename = "se.cygni.paintbot.api.request.StartGame", rename_all = "camelCase")]
    StartGame {
        receiving_player_id: Option<Uuid>,
        timestamp: u64,
    },
    #[serde(rename = "se.cygni.paintbot.api.request.RegisterMove", rename_all = "camelCase")]
    RegisterMove {
        game_id: Uuid,
        game_tick: u32,
        direction: Action,
        receiving_player_id: Option<Uuid>,
        timestamp: u64,
    },
    #[serde(rename = "se.cygni.paintbot.api.request.HeartBeatRequest", rename_all = "camelCase")]
    HeartBeatRequest {
        receiving_player_id: Option<Uuid>,
        timestamp: u64,
    },
}

impl OutgoingMessage {
    pub fn register_player(player_name: &str, game_settings: Option<GameSettings>) -> Self {
        Self::RegisterPlayer {
            player_name: player_name.to_string(),
            game_settings,
            receiving_player_id: None,
            timestamp: now_millis(),
        }
    }

    pub fn client_info(receiving_player_id: Option<Uuid>) -> Self {
        Self::ClientInfo {
            language: LANGUAGE.to_string(),
            language_version: LANGUAGE_VERSION.to_string(),
            operating_system: std::env::consts::OS.to_string(),
            operating_system_version: String::new(),
            client_version: CLIENT_VERSION.to_string(),
            receiving_player_id,
            timestamp: now_millis(),
        }
    }

    pub fn start_game() -> Self {
        Self::StartGame {
            receiving_player_id: None,
            timestamp: now_millis(),
        }
    }

    /// Move answering `event`, echoing its game id, tick and addressee.
    pub fn register_move(event: &MapUpdateEvent, direction: Action) -> Self {
        Self::RegisterMove {
            game_id: event.game_id,
            game_tick: event.game_tick,
            direction,
            receiving_player_id: event.receiving_player_id,
            timestamp: now_millis(),
        }
    }

    pub fn heart_beat_request(receiving_player_id: Option<Uuid>) -> Self {
        Self::HeartBeatRequest {
            receiving_player_id,
            timestamp: now_millis(),
        }
    }

    pub fn message_type(&self) -> &'static str {
        match self {
            OutgoingMessage::RegisterPlayer { .. } => REGISTER_PLAYER,
            OutgoingMessage::ClientInfo { .. } => CLIENT_INFO,
            OutgoingMessage::StartGame { .. } => START_GAME,
            OutgoingMessage::RegisterMove { .. } => REGISTER_MOVE,
            OutgoingMessage::HeartBeatRequest { .. } => HEART_BEAT_REQUEST,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
