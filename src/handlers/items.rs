//! Item enrollment and inspection handlers.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::db::{self, try_lock};
use crate::learner::LearnerContext;
use crate::state::AppState;

use super::{ApiError, ApiJson, ApiQuery};

/// Longest accepted item id
const MAX_ITEM_ID_LEN: usize = 256;

/// Default number of history entries returned
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Most history entries returned in one response
const MAX_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
  pub item_id: String,
}

/// POST /items
///
/// Creates the item with initial scheduling state; 201 when created, 200 when
/// it already existed.
pub async fn enroll_item(
  learner: LearnerContext,
  State(state): State<AppState>,
  ApiJson(request): ApiJson<EnrollRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let item_id = request.item_id.trim();
  if item_id.is_empty() || item_id.len() > MAX_ITEM_ID_LEN {
    return Err(ApiError::BadRequest(format!(
      "item_id must be 1 to {} characters",
      MAX_ITEM_ID_LEN
    )));
  }

  let conn = try_lock(&state.db)?;
  let (item, created) = db::enroll_item(
    &conn,
    &learner.learner_id,
    item_id,
    state.srs.history_capacity,
    Utc::now(),
  )?;

  let status = if created {
    tracing::info!("Learner {} enrolled item {}", learner.learner_id, item_id);
    StatusCode::CREATED
  } else {
    StatusCode::OK
  };
  Ok((status, Json(item)))
}

/// GET /items/{item_id}
pub async fn get_item(
  learner: LearnerContext,
  State(state): State<AppState>,
  Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let conn = try_lock(&state.db)?;
  let item = db::get_item(&conn, &learner.learner_id, &item_id, state.srs.history_capacity)?
    .ok_or_else(|| ApiError::NotFound(format!("item {} not found", item_id)))?;
  Ok(Json(item))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
  pub limit: Option<usize>,
}

/// GET /items/{item_id}/history
///
/// Newest first, at most `MAX_HISTORY_LIMIT` entries.
pub async fn item_history(
  learner: LearnerContext,
  State(state): State<AppState>,
  Path(item_id): Path<String>,
  ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
  let conn = try_lock(&state.db)?;
  if db::get_item(&conn, &learner.learner_id, &item_id, 0)?.is_none() {
    return Err(ApiError::NotFound(format!("item {} not found", item_id)));
  }

  let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(MAX_HISTORY_LIMIT);
  let logs = db::get_review_logs(&conn, &learner.learner_id, &item_id, limit)?;
  Ok(Json(logs))
}
