//! Chat session: optimistic send and pending reconciliation
//!
//! The session owns the display name, the visible feed, the pending map
//! (client message id to feed position), and the transcript store. It is
//! driven by the transport through [`Session::handle_inbound`] and
//! [`Session::handle_disconnect`], so reconciliation is testable without
//! a live socket.
//!
//! Messages enter the transcript only through the echo path: a send that
//! is never echoed back stays in the feed but is never persisted.

use std::collections::HashMap;

use parley_protocol::{now_millis, parse_inbound, ChatMessage};

use crate::feed::{render_feed, Delivery, Direction, FeedEntry};
use crate::transcript::TranscriptStore;

/// Outcome of handling one inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// The payload confirmed an earlier optimistic send
    Confirmed { index: usize },
    /// The payload is a new incoming message
    Incoming { index: usize },
}

impl InboundOutcome {
    /// Feed position of the affected entry
    pub fn index(&self) -> usize {
        match self {
            Self::Confirmed { index } | Self::Incoming { index } => *index,
        }
    }
}

/// A chat session bound to one display name and one transcript store
pub struct Session {
    user: String,
    feed: Vec<FeedEntry>,
    /// Pending message id -> feed position, removed on confirmation or
    /// cleared (entries marked failed) on disconnect
    pending: HashMap<String, usize>,
    store: TranscriptStore,
}

impl Session {
    /// Create a session and rehydrate the persisted transcript into the
    /// feed
    ///
    /// Rehydrated records render as outgoing when their user matches the
    /// session's display name.
    pub fn new(user: impl Into<String>, store: TranscriptStore) -> Self {
        let user = user.into();
        let feed = store
            .load_all()
            .into_iter()
            .map(|record| {
                let direction = if record.user == user {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                };
                FeedEntry::confirmed(record, direction)
            })
            .collect();

        Self {
            user,
            feed,
            pending: HashMap::new(),
            store,
        }
    }

    /// Session display name
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The visible feed, oldest first
    pub fn feed(&self) -> &[FeedEntry] {
        &self.feed
    }

    /// Number of sends still awaiting confirmation
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Build and track an optimistic send
    ///
    /// Appends a pending outgoing entry to the feed, records the id in
    /// the pending map, and returns the record for the transport to put
    /// on the wire. Nothing is persisted until the echo arrives.
    pub fn send(&mut self, text: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::outgoing(self.user.clone(), text);
        let index = self.feed.len();
        self.feed.push(FeedEntry::outgoing_pending(message.clone()));
        if let Some(id) = &message.id {
            self.pending.insert(id.clone(), index);
        }
        tracing::debug!(id = ?message.id, "Tracking pending send");
        message
    }

    /// Handle one inbound text payload
    ///
    /// A payload whose id matches a pending entry confirms that send:
    /// the entry's metadata is updated from the server-supplied fields,
    /// the confirmed record is persisted, and the pending entry is
    /// removed. Anything else is a new incoming message, rendered and
    /// persisted as such.
    pub fn handle_inbound(&mut self, raw: &str) -> InboundOutcome {
        let payload = parse_inbound(raw);
        if payload.is_wrapped() {
            tracing::debug!("Wrapped non-record payload from remote");
        }
        let message = payload.into_message();

        if let Some(index) = message.id.as_ref().and_then(|id| self.pending.remove(id)) {
            return self.confirm_pending(index, message);
        }

        self.record_incoming(message)
    }

    /// Mark every still-pending send as failed
    ///
    /// Called on disconnect. Failed entries stay visible in the feed but
    /// leave the pending map, so a matching id after a later reconnect is
    /// a fresh incoming message, never a late confirmation. Returns how
    /// many entries were failed.
    pub fn handle_disconnect(&mut self) -> usize {
        let failed = self.pending.len();
        for (_, index) in self.pending.drain() {
            if let Some(entry) = self.feed.get_mut(index) {
                entry.delivery = Delivery::Failed;
            }
        }
        if failed > 0 {
            tracing::info!(count = failed, "Marked pending sends as failed");
        }
        failed
    }

    /// Mark one tracked send as failed (wire send did not go out)
    pub fn fail_pending(&mut self, id: &str) {
        if let Some(index) = self.pending.remove(id) {
            if let Some(entry) = self.feed.get_mut(index) {
                entry.delivery = Delivery::Failed;
            }
        }
    }

    /// Render one feed entry as a display line
    pub fn render_entry(&self, index: usize) -> Option<String> {
        self.feed.get(index).map(FeedEntry::render)
    }

    /// Render the whole feed
    pub fn render_feed(&self) -> String {
        render_feed(&self.feed)
    }

    /// Clear the persisted transcript and the visible feed
    pub fn clear_history(&mut self) -> parley_utils::Result<()> {
        self.store.clear()?;
        self.feed.clear();
        self.pending.clear();
        Ok(())
    }

    /// Access the backing transcript store
    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    fn confirm_pending(&mut self, index: usize, echoed: ChatMessage) -> InboundOutcome {
        let now = now_millis();
        let confirmed = {
            let entry = &mut self.feed[index];
            entry.delivery = Delivery::Confirmed;
            // Prefer the server-supplied metadata when present
            entry.message.time = echoed.time_or(now);
            entry.message.text = echoed.text;
            if !echoed.user.is_empty() {
                entry.message.user = echoed.user;
            }
            entry.message.clone()
        };
        self.persist(&confirmed);
        InboundOutcome::Confirmed { index }
    }

    fn record_incoming(&mut self, message: ChatMessage) -> InboundOutcome {
        let now = now_millis();
        let record = ChatMessage {
            id: Some(
                message
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("r_{}", now)),
            ),
            user: message.display_user().to_string(),
            text: message.text.clone(),
            time: message.time_or(now),
        };
        let index = self.feed.len();
        self.feed.push(FeedEntry::incoming(record.clone()));
        self.persist(&record);
        InboundOutcome::Incoming { index }
    }

    // Persistence failures never surface to the user; the feed already
    // shows the message.
    fn persist(&self, record: &ChatMessage) {
        if let Err(e) = self.store.append(record) {
            tracing::warn!("Failed to persist transcript record: {}", e);
        }
    }
}
