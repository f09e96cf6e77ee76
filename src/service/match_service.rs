//! Match and commentary business logic.
//!
//! [`MatchService`] owns the store and the live hub. Writes persist
//! first and broadcast to live clients only after the insert returns,
//! so a failed commit never produces a phantom event.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Commentary, Match, MatchStatus};
use crate::error::GatewayError;
use crate::persistence::postgres::{NewCommentary, NewMatch};
use crate::persistence::MatchStore;
use crate::ws::LiveHub;

/// Maximum number of rows returned by list endpoints.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Validated input for creating a match.
#[derive(Debug, Clone)]
pub struct CreateMatch {
    /// Sport discipline.
    pub sport: String,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Scheduled kickoff.
    pub start_time: chrono::DateTime<Utc>,
    /// Scheduled end.
    pub end_time: chrono::DateTime<Utc>,
    /// Initial home score.
    pub home_score: i32,
    /// Initial away score.
    pub away_score: i32,
}

/// Validated input for creating a commentary entry.
#[derive(Debug, Clone)]
pub struct CreateCommentary {
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
    /// Optional structured extras.
    pub metadata: Option<serde_json::Value>,
    /// Optional tag list.
    pub tags: Option<Vec<String>>,
}

/// Business logic for matches and commentary.
#[derive(Debug)]
pub struct MatchService {
    store: MatchStore,
    live_hub: Arc<LiveHub>,
}

impl MatchService {
    /// Creates the service over a store and the live hub.
    #[must_use]
    pub fn new(store: MatchStore, live_hub: Arc<LiveHub>) -> Self {
        Self { store, live_hub }
    }

    /// Persists a new match, derives its status from the schedule, and
    /// broadcasts `match_created` to every live connection.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn create_match(&self, input: CreateMatch) -> Result<Match, GatewayError> {
        let status = MatchStatus::from_schedule(input.start_time, input.end_time, Utc::now());
        let created = self
            .store
            .insert_match(NewMatch {
                sport: input.sport,
                home_team: input.home_team,
                away_team: input.away_team,
                start_time: input.start_time,
                end_time: input.end_time,
                home_score: input.home_score,
                away_score: input.away_score,
                status,
            })
            .await?;

        self.live_hub.broadcast_match_created(&created).await;
        Ok(created)
    }

    /// Lists matches, newest first. `limit` is clamped to
    /// [`MAX_LIST_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_matches(&self, limit: Option<i64>) -> Result<Vec<Match>, GatewayError> {
        let limit = limit.unwrap_or(50).clamp(1, MAX_LIST_LIMIT);
        self.store.list_matches(limit).await
    }

    /// Persists a commentary entry and broadcasts `new_commentary` to the
    /// match topic's live subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MatchNotFound`] if the match does not
    /// exist, or a [`GatewayError::PersistenceError`] on database failure.
    pub async fn create_commentary(
        &self,
        match_id: i64,
        input: CreateCommentary,
    ) -> Result<Commentary, GatewayError> {
        if !self.store.match_exists(match_id).await? {
            return Err(GatewayError::MatchNotFound(match_id));
        }

        let created = self
            .store
            .insert_commentary(NewCommentary {
                match_id,
                minute: input.minute,
                sequence: input.sequence,
                period: input.period,
                event_type: input.event_type,
                actor: input.actor,
                team: input.team,
                message: input.message,
                metadata: input.metadata,
                tags: input.tags,
            })
            .await?;

        self.live_hub
            .broadcast_commentary(created.match_id, &created)
            .await;
        Ok(created)
    }

    /// Lists commentary for a match, newest first. `limit` is clamped to
    /// [`MAX_LIST_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_commentary(
        &self,
        match_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<Commentary>, GatewayError> {
        let limit = limit.unwrap_or(MAX_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.store.list_commentary(match_id, limit).await
    }
}
