//! Commentary handlers: create and list per match.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CommentaryCreatedResponse, CommentaryListResponse, CreateCommentaryRequest,
    ListCommentaryQuery,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /matches/{id}/commentary` — List commentary, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid query or persistence failure.
#[utoipa::path(
    get,
    path = "/matches/{id}/commentary",
    tag = "Commentary",
    summary = "List commentary for a match",
    params(
        ("id" = i64, Path, description = "Match ID"),
        ListCommentaryQuery,
    ),
    responses(
        (status = 200, description = "Commentary list", body = CommentaryListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_commentary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ListCommentaryQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let limit = query.validate()?;
    let data = state.match_service.list_commentary(id, limit).await?;
    Ok(Json(CommentaryListResponse { data }))
}

/// `POST /matches/{id}/commentary` — Create a commentary entry.
///
/// A `new_commentary` event is pushed to the match topic's live
/// subscribers after the write commits.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid payload, a missing match, or
/// persistence failure.
#[utoipa::path(
    post,
    path = "/matches/{id}/commentary",
    tag = "Commentary",
    summary = "Add commentary to a match",
    params(
        ("id" = i64, Path, description = "Match ID"),
    ),
    request_body = CreateCommentaryRequest,
    responses(
        (status = 201, description = "Commentary created", body = CommentaryCreatedResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn create_commentary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateCommentaryRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let input = req.validate()?;
    let data = state.match_service.create_commentary(id, input).await?;
    Ok((StatusCode::CREATED, Json(CommentaryCreatedResponse { data })))
}

/// Commentary routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/matches/{id}/commentary",
        get(list_commentary).post(create_commentary),
    )
}
