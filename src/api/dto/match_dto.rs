//! Match DTOs for create and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Match;
use crate::error::GatewayError;
use crate::service::match_service::CreateMatch;

/// Request body for `POST /matches`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
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
    /// Initial home score; defaults to 0.
    #[serde(default)]
    pub home_score: Option<i32>,
    /// Initial away score; defaults to 0.
    #[serde(default)]
    pub away_score: Option<i32>,
}

impl CreateMatchRequest {
    /// Validates the payload and converts it to a service input.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when a required field is
    /// blank, a score is negative, or the end precedes the start.
    pub fn validate(self) -> Result<CreateMatch, GatewayError> {
        for (name, value) in [
            ("sport", &self.sport),
            ("homeTeam", &self.home_team),
            ("awayTeam", &self.away_team),
        ] {
            if value.trim().is_empty() {
                return Err(GatewayError::InvalidRequest(format!(
                    "{name} must not be empty"
                )));
            }
        }
        if self.end_time <= self.start_time {
            return Err(GatewayError::InvalidRequest(
                "endTime must be after startTime".to_string(),
            ));
        }
        let home_score = self.home_score.unwrap_or(0);
        let away_score = self.away_score.unwrap_or(0);
        if home_score < 0 || away_score < 0 {
            return Err(GatewayError::InvalidRequest(
                "scores must not be negative".to_string(),
            ));
        }
        Ok(CreateMatch {
            sport: self.sport,
            home_team: self.home_team,
            away_team: self.away_team,
            start_time: self.start_time,
            end_time: self.end_time,
            home_score,
            away_score,
        })
    }
}

/// Query parameters for `GET /matches`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListMatchesQuery {
    /// Maximum rows to return (1–100). Defaults to 50.
    pub limit: Option<i64>,
}

impl ListMatchesQuery {
    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when `limit` is not
    /// positive.
    pub fn validate(&self) -> Result<Option<i64>, GatewayError> {
        match self.limit {
            Some(limit) if limit < 1 => Err(GatewayError::InvalidRequest(
                "limit must be a positive integer".to_string(),
            )),
            other => Ok(other),
        }
    }
}

/// Response body for `POST /matches` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchCreatedResponse {
    /// The created match.
    pub data: Match,
}

/// Response body for `GET /matches`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchListResponse {
    /// Matches, newest first.
    pub data: Vec<Match>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request() -> CreateMatchRequest {
        let now = Utc::now();
        CreateMatchRequest {
            sport: "football".to_string(),
            home_team: "Rovers".to_string(),
            away_team: "United".to_string(),
            start_time: now,
            end_time: now + Duration::hours(2),
            home_score: None,
            away_score: None,
        }
    }

    #[test]
    fn valid_request_defaults_scores_to_zero() {
        let input = match request().validate() {
            Ok(input) => input,
            Err(e) => panic!("expected valid request: {e}"),
        };
        assert_eq!(input.home_score, 0);
        assert_eq!(input.away_score, 0);
    }

    #[test]
    fn blank_team_is_rejected() {
        let mut req = request();
        req.home_team = "  ".to_string();
        assert!(matches!(req.validate(), Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut req = request();
        req.end_time = req.start_time - Duration::hours(1);
        assert!(matches!(req.validate(), Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn negative_score_is_rejected() {
        let mut req = request();
        req.home_score = Some(-1);
        assert!(matches!(req.validate(), Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        let query = ListMatchesQuery { limit: Some(0) };
        assert!(query.validate().is_err());
        let query = ListMatchesQuery { limit: Some(25) };
        assert!(matches!(query.validate(), Ok(Some(25))));
    }
}
