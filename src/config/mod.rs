/// Main configuration module.
/// 
/// Re-exports submodules for connection, client metadata and game configuration.
pub mod connection;
pub mod client;
pub mod game;
