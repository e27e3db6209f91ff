//! HTTP request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;
use vote_ledger_shared::{Ranking, VoteItem};

use crate::errors::{ApiError, Operation};
use crate::server::auth::AuthenticatedUser;
use crate::server::dto::{AddVoteItemRequest, EditVoteItemRequest, MessageResponse};
use crate::server::state::AppState;

/// Health check endpoint. Answers 503 when the store does not respond.
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .service
        .ping()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}

/// `POST /uservotes/:voteid` - cast or switch the caller's vote.
pub async fn cast_vote(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(vote_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .cast_or_switch_vote(&vote_id, &user_id)
        .await
        .map_err(ApiError::ledger(Operation::CastVote))?;
    Ok(Json(MessageResponse::ok()))
}

/// `GET /voteitem` - ranked items and voter count.
pub async fn list_items(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Ranking>, ApiError> {
    let ranking = state
        .service
        .list_ranked()
        .await
        .map_err(ApiError::ledger(Operation::ListItems))?;
    Ok(Json(ranking))
}

/// `POST /voteitem` - add an item, answering with its id.
pub async fn add_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<AddVoteItemRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    body.validate()?;
    let item_id = state
        .service
        .add_item(&body.name, &body.description)
        .await
        .map_err(ApiError::ledger(Operation::AddItem))?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(item_id))))
}

/// `PUT /voteitem` - replace an item's description.
pub async fn edit_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<EditVoteItemRequest>,
) -> Result<Json<VoteItem>, ApiError> {
    body.validate()?;
    let item = state
        .service
        .edit_item(&body.name, &body.description)
        .await
        .map_err(ApiError::ledger(Operation::EditItem))?;
    Ok(Json(item))
}

/// `DELETE /voteitem/:id` - remove an item from the catalog.
pub async fn delete_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(item_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .delete_item(&item_id)
        .await
        .map_err(ApiError::ledger(Operation::DeleteItem))?;
    Ok(Json(MessageResponse::ok()))
}

/// `DELETE /clearvote` - wipe every piece of ledger state.
pub async fn clear_votes(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let summary = state
        .service
        .reset_all()
        .await
        .map_err(ApiError::ledger(Operation::ClearVotes))?;
    info!(
        requested_by = %user_id,
        all_deleted = summary.all_deleted,
        membership_keys_removed = summary.membership_keys_removed,
        "Vote data cleared"
    );
    Ok(Json(MessageResponse::new(summary.message())))
}
