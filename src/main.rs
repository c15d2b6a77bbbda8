//! Main entry point for the paint bot.
//!
//! Plays one training game with the power-up hunter strategy.

use paint_grid::client::start;
use paint_grid::config::game::desired_settings;
use paint_grid::game::types::GameMode;
use paint_grid::strategy::PowerUpHunter;

const PLAYER_NAME: &str = "rusty-painter";

#[actix::main]
async fn main() {
    // Initialize logger from environment variable (RUST_LOG).
    env_logger::init();

    if let Err(e) = start(PLAYER_NAME, GameMode::Training, Some(desired_settings()), PowerUpHunter::new()).await {
        log::error!("[Main] Session failed: {}", e);
        std::process::exit(1);
    }
}
