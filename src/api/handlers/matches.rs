//! Match CRUD handlers: create and list.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreateMatchRequest, ListMatchesQuery, MatchCreatedResponse, MatchListResponse,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /matches` — List matches, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid query or persistence failure.
#[utoipa::path(
    get,
    path = "/matches",
    tag = "Matches",
    summary = "List matches",
    description = "Returns matches ordered by creation time, newest first. `limit` defaults to 50 and is capped at 100.",
    params(ListMatchesQuery),
    responses(
        (status = 200, description = "Match list", body = MatchListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<ListMatchesQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let limit = query.validate()?;
    let data = state.match_service.list_matches(limit).await?;
    Ok(Json(MatchListResponse { data }))
}

/// `POST /matches` — Create a new match.
///
/// The match status is derived server-side from the schedule, and a
/// `match_created` event is pushed to every live connection after the
/// write commits.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid payload or persistence failure.
#[utoipa::path(
    post,
    path = "/matches",
    tag = "Matches",
    summary = "Create a match",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match created", body = MatchCreatedResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
    )
)]
pub async fn create_match(
    State(state): State<AppState>,
    Json(req): Json<CreateMatchRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let input = req.validate()?;
    let data = state.match_service.create_match(input).await?;
    Ok((StatusCode::CREATED, Json(MatchCreatedResponse { data })))
}

/// Match routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/matches", get(list_matches).post(create_match))
}
