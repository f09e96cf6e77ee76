//! Commentary entity: a single timeline entry attached to a match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A commentary entry on a match timeline.
///
/// `minute` and `sequence` order entries within a match; `sequence`
/// disambiguates multiple entries in the same minute.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Commentary {
    /// Database-assigned identifier.
    pub id: i64,
    /// Match this entry belongs to.
    pub match_id: i64,
    /// Match minute the entry refers to.
    pub minute: i32,
    /// Ordering within the same minute.
    pub sequence: i32,
    /// Period of play (e.g. `"1H"`, `"2H"`, `"ET"`).
    pub period: String,
    /// Event discriminator (e.g. `"goal"`, `"card"`).
    pub event_type: String,
    /// Player or official the entry is about.
    pub actor: String,
    /// Team the entry is about.
    pub team: String,
    /// Free-text commentary message.
    pub message: String,
    /// Optional structured extras.
    pub metadata: Option<serde_json::Value>,
    /// Optional free-form tags.
    pub tags: Option<Vec<String>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}
