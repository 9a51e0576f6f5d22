use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::{ReviewTelemetry, Sm2Result, INITIAL_EASE_FACTOR};

/// SM-2 scheduling state carried between reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
}

impl Default for ReviewState {
  fn default() -> Self {
    Self {
      ease_factor: INITIAL_EASE_FACTOR,
      interval_days: 1,
      repetitions: 0,
    }
  }
}

/// A reviewable item as stored for one learner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrsItem {
  pub learner_id: String,
  pub item_id: String,

  // SM-2 fields
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub next_review: DateTime<Utc>,

  #[serde(flatten)]
  pub telemetry: ReviewTelemetry,

  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl SrsItem {
  /// A freshly enrolled item. It is due immediately.
  pub fn new(learner_id: String, item_id: String, history_capacity: usize, now: DateTime<Utc>) -> Self {
    let state = ReviewState::default();
    Self {
      learner_id,
      item_id,
      ease_factor: state.ease_factor,
      interval_days: state.interval_days,
      repetitions: state.repetitions,
      next_review: now,
      telemetry: ReviewTelemetry::new(history_capacity),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn state(&self) -> ReviewState {
    ReviewState {
      ease_factor: self.ease_factor,
      interval_days: self.interval_days,
      repetitions: self.repetitions,
    }
  }

  /// Apply a scheduler result. All four scheduling fields are replaced together.
  pub fn apply(&mut self, result: &Sm2Result, now: DateTime<Utc>) {
    self.ease_factor = result.ease_factor;
    self.interval_days = result.interval_days;
    self.repetitions = result.repetitions;
    self.next_review = result.next_review;
    self.updated_at = now;
  }
}
