//! Commentary DTOs for create and list operations.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Commentary;
use crate::error::GatewayError;
use crate::service::match_service::CreateCommentary;

/// Request body for `POST /matches/{id}/commentary`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentaryRequest {
    /// Match minute; defaults to 0.
    #[serde(default)]
    pub minute: Option<i32>,
    /// Ordering within the same minute; defaults to 0.
    #[serde(default)]
    pub sequence: Option<i32>,
    /// Period of play; defaults to empty.
    #[serde(default)]
    pub period: Option<String>,
    /// Event discriminator; defaults to empty.
    #[serde(default)]
    pub event_type: Option<String>,
    /// Player or official; defaults to empty.
    #[serde(default)]
    pub actor: Option<String>,
    /// Team; defaults to empty.
    #[serde(default)]
    pub team: Option<String>,
    /// Free-text commentary message.
    pub message: String,
    /// Optional structured extras.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Optional tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl CreateCommentaryRequest {
    /// Validates the payload and converts it to a service input.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the message is blank
    /// or minute/sequence are negative.
    pub fn validate(self) -> Result<CreateCommentary, GatewayError> {
        if self.message.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }
        let minute = self.minute.unwrap_or(0);
        let sequence = self.sequence.unwrap_or(0);
        if minute < 0 || sequence < 0 {
            return Err(GatewayError::InvalidRequest(
                "minute and sequence must not be negative".to_string(),
            ));
        }
        Ok(CreateCommentary {
            minute,
            sequence,
            period: self.period.unwrap_or_default(),
            event_type: self.event_type.unwrap_or_default(),
            actor: self.actor.unwrap_or_default(),
            team: self.team.unwrap_or_default(),
            message: self.message,
            metadata: self.metadata,
            tags: self.tags,
        })
    }
}

/// Query parameters for `GET /matches/{id}/commentary`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListCommentaryQuery {
    /// Maximum rows to return (1–100). Defaults to 100.
    pub limit: Option<i64>,
}

impl ListCommentaryQuery {
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

/// Response body for `POST /matches/{id}/commentary` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentaryCreatedResponse {
    /// The created commentary entry.
    pub data: Commentary,
}

/// Response body for `GET /matches/{id}/commentary`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentaryListResponse {
    /// Commentary entries, newest first.
    pub data: Vec<Commentary>,
}
