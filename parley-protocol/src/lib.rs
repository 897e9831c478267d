//! parley-protocol: Wire format shared by the parley chat clients
//!
//! This crate defines the chat message record exchanged with the remote
//! endpoint as JSON text frames, the total inbound parser that wraps
//! unparsable payloads instead of dropping them, and client-side message
//! id generation.

pub mod message;

// Re-export main types at crate root
pub use message::{
    generate_id, now_millis, parse_inbound, ChatMessage, InboundPayload, WireError, REMOTE_USER,
};
