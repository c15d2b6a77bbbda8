//! Client library for the paint grid game.
//!
//! Connects a [`strategy::Strategy`] to a game server over a websocket, in
//! training or tournament mode, and answers every map update with a move.

pub mod client;
pub mod config;
pub mod game;
pub mod strategy;

pub use client::{start, start_with_config};
