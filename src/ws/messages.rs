//! Live channel wire format: inbound control frames and outbound events.

use serde::Serialize;

use crate::domain::{Commentary, Match};

/// Maximum accepted inbound frame size in bytes (1 MiB). Larger frames
/// are rejected at the transport level and never reach the dispatcher.
pub const MAX_FRAME_BYTES: usize = 1_048_576;

/// Fixed diagnostic sent when an inbound frame is not valid JSON.
pub const MALFORMED_FRAME_MESSAGE: &str = "invalid JSON";

/// Server → client event, serialized as a single self-contained text frame.
///
/// Events are ephemeral: never stored, never replayed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Sent once, immediately after a connection is admitted.
    Welcome,
    /// Acknowledges a subscribe control frame.
    Subscribed {
        /// Topic the client is now subscribed to.
        #[serde(rename = "matchId")]
        match_id: i64,
    },
    /// Acknowledges an unsubscribe control frame.
    Unsubscribed {
        /// Topic the client is no longer subscribed to.
        #[serde(rename = "matchId")]
        match_id: i64,
    },
    /// Reports a malformed inbound frame; the connection stays open.
    Error {
        /// Diagnostic message.
        message: String,
    },
    /// A match was created; broadcast to every open connection.
    MatchCreated {
        /// The created match.
        data: Match,
    },
    /// New commentary on a match; delivered to that topic's subscribers.
    NewCommentary {
        /// The created commentary entry.
        data: Commentary,
    },
}

impl LiveEvent {
    /// Serializes the event into its text frame.
    #[must_use]
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Parsed form of an inbound control frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// `{"type":"subscribe","matchId":N}`
    Subscribe {
        /// Topic to subscribe to.
        match_id: i64,
    },
    /// `{"type":"unsubscribe","matchId":N}`
    Unsubscribe {
        /// Topic to unsubscribe from.
        match_id: i64,
    },
    /// Well-formed JSON that is not a recognized control frame.
    /// Dropped silently, matching the reference protocol.
    Ignored,
    /// Not valid JSON; answered with an [`LiveEvent::Error`].
    Malformed,
}

/// Parses an inbound text frame.
///
/// A recognized `type` with a missing or non-integer `matchId` is
/// [`ClientFrame::Ignored`], not an error.
#[must_use]
pub fn parse_client_frame(text: &str) -> ClientFrame {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return ClientFrame::Malformed;
    };
    let match_id = value.get("matchId").and_then(serde_json::Value::as_i64);
    match (value.get("type").and_then(serde_json::Value::as_str), match_id) {
        (Some("subscribe"), Some(match_id)) => ClientFrame::Subscribe { match_id },
        (Some("unsubscribe"), Some(match_id)) => ClientFrame::Unsubscribe { match_id },
        _ => ClientFrame::Ignored,
    }
}
