//! Review submission and due-item handlers.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::db::{self, try_lock};
use crate::domain::SrsItem;
use crate::learner::LearnerContext;
use crate::services::{self, ReviewOutcome, ReviewSubmission};
use crate::state::AppState;

use super::{ApiError, ApiJson, ApiQuery};

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  pub item_id: String,
  /// Raw 0-5 rating; anything else, fractions included, is rejected, not clamped
  pub quality: Number,
  #[serde(default)]
  pub response_time_ms: u64,
}

/// POST /review
pub async fn submit_review(
  learner: LearnerContext,
  State(state): State<AppState>,
  ApiJson(request): ApiJson<ReviewRequest>,
) -> Result<Json<ReviewOutcome>, ApiError> {
  let quality = request.quality.as_i64().ok_or_else(|| {
    ApiError::InvalidQuality(format!(
      "quality must be an integer between 0 and 5, got {}",
      request.quality
    ))
  })?;
  let submission = ReviewSubmission {
    item_id: request.item_id,
    quality,
    response_time_ms: request.response_time_ms,
  };

  let mut conn = try_lock(&state.db)?;
  let outcome = services::submit_review(
    &mut conn,
    &learner.learner_id,
    &submission,
    state.srs.history_capacity,
    Utc::now(),
  )
  .inspect_err(|e| tracing::info!("Review rejected for {}: {}", learner.learner_id, e))?;

  Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct DueQuery {
  pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DueResponse {
  pub items: Vec<SrsItem>,
  pub as_of: DateTime<Utc>,
}

/// GET /due
///
/// `limit` can shrink the page but never grow it past the configured size.
pub async fn due_items(
  learner: LearnerContext,
  State(state): State<AppState>,
  ApiQuery(query): ApiQuery<DueQuery>,
) -> Result<Json<DueResponse>, ApiError> {
  let page_size = state.srs.due_page_size;
  let limit = query.limit.map_or(page_size, |l| l.min(page_size));
  let now = Utc::now();

  let conn = try_lock(&state.db)?;
  let items = db::get_due_items(&conn, &learner.learner_id, now, limit)?;

  Ok(Json(DueResponse { items, as_of: now }))
}
