//! Database row types for the `matches` and `commentary` tables.

use chrono::{DateTime, Utc};

use crate::domain::{Commentary, Match, MatchStatus};
use crate::error::GatewayError;

/// A row from the `matches` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Sport discipline.
    pub sport: String,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Scheduled kickoff.
    pub start_time: DateTime<Utc>,
    /// Scheduled end.
    pub end_time: DateTime<Utc>,
    /// Home team score.
    pub home_score: i32,
    /// Away team score.
    pub away_score: i32,
    /// Status as stored (`scheduled` / `live` / `finished`).
    pub status: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for Match {
    type Error = GatewayError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let status: MatchStatus = row
            .status
            .parse()
            .map_err(GatewayError::PersistenceError)?;
        Ok(Self {
            id: row.id,
            sport: row.sport,
            home_team: row.home_team,
            away_team: row.away_team,
            start_time: row.start_time,
            end_time: row.end_time,
            home_score: row.home_score,
            away_score: row.away_score,
            status,
            created_at: row.created_at,
        })
    }
}

/// A row from the `commentary` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentaryRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Match this entry belongs to.
    pub match_id: i64,
    /// Match minute.
    pub minute: i32,
    /// Ordering within the same minute.
    pub sequence: i32,
    /// Period of play.
    pub period: String,
    /// Event discriminator.
    pub event_type: String,
    /// Player or official.
    pub actor: String,
    /// Team.
    pub team: String,
    /// Free-text message.
    pub message: String,
    /// Optional JSONB extras.
    pub metadata: Option<serde_json::Value>,
    /// Optional tag list.
    pub tags: Option<Vec<String>>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<CommentaryRow> for Commentary {
    fn from(row: CommentaryRow) -> Self {
        Self {
            id: row.id,
            match_id: row.match_id,
            minute: row.minute,
            sequence: row.sequence,
            period: row.period,
            event_type: row.event_type,
            actor: row.actor,
            team: row.team,
            message: row.message,
            metadata: row.metadata,
            tags: row.tags,
            created_at: row.created_at,
        }
    }
}
