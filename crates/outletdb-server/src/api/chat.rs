//! Chatbot endpoints: free-text query resolution and disambiguation.
//!
//! These return the engine's [`QueryReply`] body verbatim, with `status` at
//! the top level, so conversational clients can branch on it directly without
//! unwrapping the envelope used by the outlet endpoints.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use outletdb_core::QueryReply;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ChatQuery {
    query: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SelectQuery {
    user_id: String,
    choice: i64,
}

pub(super) async fn resolve_query(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ChatQuery>,
) -> Result<Json<QueryReply>, ApiError> {
    let reply = state
        .resolver
        .resolve_query(&params.query, &params.user_id)
        .await
        .map_err(|e| map_db_error(req_id.0, &outletdb_db::DbError::from(e)))?;

    Ok(Json(reply))
}

pub(super) async fn resolve_selection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SelectQuery>,
) -> Result<Json<QueryReply>, ApiError> {
    let reply = state
        .resolver
        .resolve_selection(&params.user_id, params.choice)
        .await
        .map_err(|e| map_db_error(req_id.0, &outletdb_db::DbError::from(e)))?;

    Ok(Json(reply))
}
