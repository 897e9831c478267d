//! Visible message feed
//!
//! Projects message records into display lines tagged with direction and
//! delivery state. The feed is the client-side view; the transcript store
//! holds only confirmed records.

use chrono::{Local, LocalResult, TimeZone};
use parley_protocol::ChatMessage;

/// Whether a message came from this session or the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Delivery state of a feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sent optimistically, awaiting the server echo
    Pending,
    /// Confirmed by the server (or received from the remote)
    Confirmed,
    /// Still pending when the connection dropped
    Failed,
}

/// One visible message in the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub message: ChatMessage,
    pub direction: Direction,
    pub delivery: Delivery,
}

impl FeedEntry {
    /// An optimistically sent message awaiting confirmation
    pub fn outgoing_pending(message: ChatMessage) -> Self {
        Self {
            message,
            direction: Direction::Outgoing,
            delivery: Delivery::Pending,
        }
    }

    /// A message received from the remote
    pub fn incoming(message: ChatMessage) -> Self {
        Self {
            message,
            direction: Direction::Incoming,
            delivery: Delivery::Confirmed,
        }
    }

    /// A confirmed record rehydrated from the transcript
    pub fn confirmed(message: ChatMessage, direction: Direction) -> Self {
        Self {
            message,
            direction,
            delivery: Delivery::Confirmed,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.delivery == Delivery::Pending
    }

    /// Render as a display line
    ///
    /// Outgoing messages are prefixed `>`, incoming `<`; pending and
    /// failed entries carry a trailing tag.
    pub fn render(&self) -> String {
        let marker = match self.direction {
            Direction::Outgoing => '>',
            Direction::Incoming => '<',
        };
        let tag = match self.delivery {
            Delivery::Pending => " [pending]",
            Delivery::Failed => " [failed]",
            Delivery::Confirmed => "",
        };
        format!(
            "{} [{}] {}: {}{}",
            marker,
            format_local_time(self.message.time),
            self.message.display_user(),
            self.message.text,
            tag
        )
    }
}

/// Render a whole feed, one line per entry
pub fn render_feed(entries: &[FeedEntry]) -> String {
    entries
        .iter()
        .map(FeedEntry::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format epoch milliseconds as a localized time of day
pub fn format_local_time(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis) {
        LocalResult::Single(dt) => dt.format("%H:%M:%S").to_string(),
        _ => millis.to_string(),
    }
}
