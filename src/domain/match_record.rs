//! Match entity and schedule-derived status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a match, derived from its schedule at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Kickoff is in the future.
    Scheduled,
    /// The match is currently in progress.
    Live,
    /// The match has ended.
    Finished,
}

impl MatchStatus {
    /// Derives the status from the match schedule relative to `now`.
    #[must_use]
    pub fn from_schedule(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start {
            Self::Scheduled
        } else if now > end {
            Self::Finished
        } else {
            Self::Live
        }
    }

    /// Returns the lowercase string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Finished => "finished",
        }
    }
}

impl std::str::FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "live" => Ok(Self::Live),
            "finished" => Ok(Self::Finished),
            other => Err(format!("unknown match status: {other}")),
        }
    }
}

/// A sports match record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Database-assigned identifier; also the live-channel topic ID.
    pub id: i64,
    /// Sport discipline (e.g. `"football"`).
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
    /// Schedule-derived status.
    pub status: MatchStatus,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}
