/// Connection configuration constants.
/// 
/// This module defines where the client connects and how often it sends
/// keep-alive messages once registered.
use std::time::Duration;

/// Base URL of the game server, without the mode path.
pub const SERVER_BASE_URL: &str = "ws://server.paintbot.cygni.se";

/// Path selecting training matchmaking.
pub const TRAINING_PATH: &str = "/training";

/// Path selecting tournament matchmaking.
pub const TOURNAMENT_PATH: &str = "/tournament";

/// Time (in seconds) between two heartbeat requests.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Runtime connection settings, defaulting to the constants above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub server_base_url: String,
    pub heartbeat_interval: Duration,
}

impl SessionConfig {
    /// Same defaults, pointed at another server (e.g. a local test server).
    pub fn with_server_url(server_base_url: impl Into<String>) -> Self {
        Self {
            server_base_url: server_base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_base_url: SERVER_BASE_URL.to_string(),
            heartbeat_interval: Duration::from_secs(HEARTBEAT_INTERVAL_SECS),
        }
    }
}
