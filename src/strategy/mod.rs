//! Move strategies.
//!
//! The session calls a [`Strategy`] once per tick, synchronously, and sends the
//! returned action back before reading the next message.

pub mod power_up_hunter;

pub use power_up_hunter::PowerUpHunter;

use crate::client::messages::MapUpdateEvent;
use crate::game::types::{Action, GameSettings};

pub trait Strategy {
    fn calculate_move(&mut self, settings: &GameSettings, event: &MapUpdateEvent) -> Action;
}

impl<F> Strategy for F
where
    F: FnMut(&GameSettings, &MapUpdateEvent) -> Action,
{
    fn calculate_move(&mut self, settings: &GameSettings, event: &MapUpdateEvent) -> Action {
        self(settings, event)
    }
}
