//! Review submission: read the stored state, schedule, write it back.
//!
//! The read-modify-write runs in one SQLite transaction on a connection the
//! caller holds exclusively, so two submissions for the same item cannot
//! interleave.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::db;
use crate::domain::{ReviewQuality, ReviewRecord, SrsItem};
use crate::srs::{self, SchedulerError, Sm2Result};

/// Largest response time the review log can store
pub const MAX_RESPONSE_TIME_MS: u64 = i64::MAX as u64;

#[derive(Debug, Error)]
pub enum ReviewError {
  #[error(transparent)]
  Scheduler(#[from] SchedulerError),
  #[error("response_time_ms {0} exceeds the maximum of {}", MAX_RESPONSE_TIME_MS)]
  InvalidResponseTime(u64),
  #[error("item {0} not found")]
  NotFound(String),
  #[error("storage error: {0}")]
  Storage(#[from] rusqlite::Error),
}

/// A review as submitted by a learner
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
  pub item_id: String,
  pub quality: i64,
  pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
  pub item: SrsItem,
  pub result: Sm2Result,
}

pub fn submit_review(
  conn: &mut Connection,
  learner_id: &str,
  submission: &ReviewSubmission,
  history_capacity: usize,
  now: DateTime<Utc>,
) -> Result<ReviewOutcome, ReviewError> {
  // Reject before any state is read or written
  let quality = ReviewQuality::try_from(submission.quality)?;
  if submission.response_time_ms > MAX_RESPONSE_TIME_MS {
    return Err(ReviewError::InvalidResponseTime(submission.response_time_ms));
  }

  let tx = conn.transaction()?;

  let mut item = db::get_item(&tx, learner_id, &submission.item_id, history_capacity)?
    .ok_or_else(|| ReviewError::NotFound(submission.item_id.clone()))?;

  let result = srs::calculate_sm2(&item.state(), quality, now);
  let record = ReviewRecord::new(quality, submission.response_time_ms, now);

  item.apply(&result, now);
  item.telemetry.record(record);

  db::update_item_after_review(&tx, &item)?;
  db::insert_review_log(&tx, learner_id, &item.item_id, &record)?;
  tx.commit()?;

  tracing::debug!(
    learner_id,
    item_id = %item.item_id,
    quality = quality.value(),
    interval_days = result.interval_days,
    repetitions = result.repetitions,
    "Review recorded"
  );

  Ok(ReviewOutcome { item, result })
}
