//! Session error taxonomy.
//!
//! Every variant here is fatal: the session stops and the error is returned
//! from [`crate::client::session::start`]. Recoverable pathfinding misses live
//! in [`crate::game::map_utility::MapError`] instead.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// The server sent something the client cannot act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(String),
    #[error("unknown message type: {0}")]
    UnknownType(String),
    #[error("server rejected a message: {0}")]
    InvalidMessage(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("connection failed: {0}")]
    Connection(#[from] tungstenite::Error),
    #[error("connection closed before the session ended")]
    ConnectionClosed,
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("session stopped without reporting a result")]
    Aborted,
}
