//! Local-only chat room
//!
//! No networking: a login step sets an in-memory display name, every
//! posted message goes straight into the persisted list, and the whole
//! list is re-rendered after each change. No pending state, no
//! reconciliation.

use parley_client::transcript::{format_local_datetime, TranscriptStore};
use parley_protocol::ChatMessage;
use parley_utils::Result;

/// A mock chat room bound to one display name
///
/// The display name lives only in memory; it is never persisted.
pub struct MockRoom {
    user: String,
    store: TranscriptStore,
}

impl MockRoom {
    /// Log in with a display name
    pub fn login(user: impl Into<String>, store: TranscriptStore) -> Self {
        let user = user.into();
        tracing::info!(user = %user, "Logged in to mock room");
        Self { user, store }
    }

    /// Display name for this login
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Access the backing store
    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// Append one message to the persisted list
    pub fn post(&self, text: impl Into<String>) -> Result<ChatMessage> {
        let message = ChatMessage::outgoing(self.user.clone(), text);
        self.store.append(&message)?;
        Ok(message)
    }

    /// Render the entire message list, one line per message
    ///
    /// The whole list is rebuilt from the store on every call; there is
    /// no incremental update.
    pub fn render_all(&self) -> String {
        self.store
            .load_all()
            .iter()
            .map(|record| {
                format!(
                    "[{}] {}: {}",
                    format_local_datetime(record.time),
                    record.display_user(),
                    record.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Erase all persisted messages
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}
