/// Game configuration constants.
/// 
/// This module defines client-side gameplay parameters such as logging cadence
/// and the settings requested when registering.
use crate::game::types::GameSettings;

/// Log the tick progress every N ticks.
pub const TICK_LOG_INTERVAL: u32 = 10;

/// Settings requested at registration. The server may override any of them.
pub fn desired_settings() -> GameSettings {
    GameSettings {
        max_noof_players: 5,
        time_in_ms_per_tick: 250,
        obstacles_enabled: true,
        power_ups_enabled: true,
        add_power_up_likelihood: 38,
        remove_power_up_likelihood: 5,
        training_game: true,
        points_per_tile_owned: 1,
        points_per_caused_stun: 5,
        no_of_ticks_invulnerable_after_stun: 3,
        no_of_ticks_stunned: 10,
        start_obstacles: 40,
        start_power_ups: 41,
        game_duration_in_seconds: 15,
        explosion_range: 4,
        points_per_tick: false,
    }
}
