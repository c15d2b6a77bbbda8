use serde::{Serialize, Deserialize};

use crate::config::connection::{TRAINING_PATH, TOURNAMENT_PATH};

/// A cell of the grid in 2D form. Signed so that neighbours past the edge can be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, ignoring obstacles.
    pub fn manhattan_distance(&self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Move sent back for every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Stay,
    /// Detonates the carried power-up.
    Explode,
}

impl Action {
    /// The four cardinal moves.
    pub const MOVEMENTS: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Stay => "STAY",
            Action::Explode => "EXPLODE",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a grid cell as seen in one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tile {
    Obstacle,
    #[serde(rename = "POWERUP")]
    PowerUp,
    Player,
    Open,
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        matches!(self, Tile::Open | Tile::PowerUp | Tile::Player)
    }
}

/// Matchmaking flavour, selecting the endpoint the client connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Training,
    Tournament,
}

impl GameMode {
    pub fn path(&self) -> &'static str {
        match self {
            GameMode::Training => TRAINING_PATH,
            GameMode::Tournament => TOURNAMENT_PATH,
        }
    }
}

/// Game settings, both requested at registration and negotiated by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub max_noof_players: u32,
    pub time_in_ms_per_tick: u32,
    pub obstacles_enabled: bool,
    pub power_ups_enabled: bool,
    pub add_power_up_likelihood: u32,
    pub remove_power_up_likelihood: u32,
    pub training_game: bool,
    pub points_per_tile_owned: u32,
    pub points_per_caused_stun: u32,
    pub no_of_ticks_invulnerable_after_stun: u32,
    pub no_of_ticks_stunned: u32,
    pub start_obstacles: u32,
    pub start_power_ups: u32,
    pub game_duration_in_seconds: u32,
    pub explosion_range: u32,
    pub points_per_tick: bool,
}

impl GameSettings {
    /// Number of ticks in one game, or 0 when the tick duration is unknown.
    pub fn total_ticks(&self) -> u32 {
        if self.time_in_ms_per_tick == 0 {
            return 0;
        }
        self.game_duration_in_seconds.saturating_mul(1000) / self.time_in_ms_per_tick
    }
}
