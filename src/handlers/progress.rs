use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::db::{self, try_lock, LearnerStats};
use crate::learner::LearnerContext;
use crate::state::AppState;

use super::ApiError;

/// GET /stats
pub async fn stats(
  learner: LearnerContext,
  State(state): State<AppState>,
) -> Result<Json<LearnerStats>, ApiError> {
  let conn = try_lock(&state.db)?;
  let stats = db::get_learner_stats(&conn, &learner.learner_id, Utc::now())?;
  Ok(Json(stats))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
  let database = if try_lock(&state.db).is_ok() { "ok" } else { "unavailable" };
  Json(json!({ "status": "ok", "database": database }))
}
