//! PostgreSQL implementation of the persistence layer.

use sqlx::PgPool;

use super::models::{CommentaryRow, MatchRow};
use crate::domain::{Commentary, Match, MatchStatus};
use crate::error::GatewayError;

/// Insert payload for a new match row.
#[derive(Debug, Clone)]
pub struct NewMatch {
    /// Sport discipline.
    pub sport: String,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Scheduled kickoff.
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// Scheduled end.
    pub end_time: chrono::DateTime<chrono::Utc>,
    /// Initial home score.
    pub home_score: i32,
    /// Initial away score.
    pub away_score: i32,
    /// Schedule-derived status.
    pub status: MatchStatus,
}

/// Insert payload for a new commentary row.
#[derive(Debug, Clone)]
pub struct NewCommentary {
    /// Match the entry belongs to.
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
}

/// PostgreSQL-backed store for matches and commentary, using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct MatchStore {
    pool: PgPool,
}

impl MatchStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a match and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert_match(&self, new: NewMatch) -> Result<Match, GatewayError> {
        let row = sqlx::query_as::<_, MatchRow>(
            "INSERT INTO matches \
             (sport, home_team, away_team, start_time, end_time, home_score, away_score, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, sport, home_team, away_team, start_time, end_time, \
                       home_score, away_score, status, created_at",
        )
        .bind(&new.sport)
        .bind(&new.home_team)
        .bind(&new.away_team)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.home_score)
        .bind(new.away_score)
        .bind(new.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Match::try_from(row)
    }

    /// Lists matches, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_matches(&self, limit: i64) -> Result<Vec<Match>, GatewayError> {
        let rows = sqlx::query_as::<_, MatchRow>(
            "SELECT id, sport, home_team, away_team, start_time, end_time, \
                    home_score, away_score, status, created_at \
             FROM matches ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(Match::try_from).collect()
    }

    /// Returns `true` if a match with the given ID exists.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn match_exists(&self, match_id: i64) -> Result<bool, GatewayError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM matches WHERE id = $1)",
        )
        .bind(match_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(exists)
    }

    /// Inserts a commentary entry and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert_commentary(&self, new: NewCommentary) -> Result<Commentary, GatewayError> {
        let row = sqlx::query_as::<_, CommentaryRow>(
            "INSERT INTO commentary \
             (match_id, minute, sequence, period, event_type, actor, team, message, metadata, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id, match_id, minute, sequence, period, event_type, actor, team, \
                       message, metadata, tags, created_at",
        )
        .bind(new.match_id)
        .bind(new.minute)
        .bind(new.sequence)
        .bind(&new.period)
        .bind(&new.event_type)
        .bind(&new.actor)
        .bind(&new.team)
        .bind(&new.message)
        .bind(&new.metadata)
        .bind(&new.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(Commentary::from(row))
    }

    /// Lists commentary for a match, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_commentary(
        &self,
        match_id: i64,
        limit: i64,
    ) -> Result<Vec<Commentary>, GatewayError> {
        let rows = sqlx::query_as::<_, CommentaryRow>(
            "SELECT id, match_id, minute, sequence, period, event_type, actor, team, \
                    message, metadata, tags, created_at \
             FROM commentary WHERE match_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(match_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows.into_iter().map(Commentary::from).collect())
    }
}
