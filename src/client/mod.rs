//! Websocket client for the paint game server.
//!
//! - `messages`: wire format of everything exchanged with the server.
//! - `dispatch`: session protocol state machine, free of any I/O.
//! - `session`: actor driving one connection, from registration to the end of the session.
//! - `heartbeat`: periodic keep-alive once registered.
//! - `error`: fatal session errors.

pub mod dispatch;
pub mod error;
pub mod heartbeat;
pub mod messages;
pub mod session;

pub use error::{ProtocolError, SessionError};
pub use session::{start, start_with_config};
