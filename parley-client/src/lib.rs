//! parley-client: WebSocket chat client
//!
//! Connects to a chat (or echo) endpoint over WebSocket, sends messages
//! optimistically, reconciles server echoes against pending placeholders,
//! and persists confirmed messages to a local transcript.

pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod feed;
pub mod session;
pub mod transcript;

pub use commands::{is_command, parse_command, Command, ParseError};
pub use connection::{ChatEvent, Connection, ConnectionState};
pub use feed::{Delivery, Direction, FeedEntry};
pub use session::{InboundOutcome, Session};
pub use transcript::TranscriptStore;
