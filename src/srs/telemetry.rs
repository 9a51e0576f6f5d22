//! Per-item review telemetry.
//!
//! Aggregates are updated incrementally. The in-memory history is a bounded
//! ring buffer; the complete history is the `review_logs` table.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::ReviewRecord;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

fn default_capacity() -> usize {
  DEFAULT_HISTORY_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewTelemetry {
  pub total_reviews: i64,
  pub correct_reviews: i64,
  pub average_response_time_ms: f64,
  /// Most recent reviews, oldest first
  #[serde(default, skip_serializing_if = "VecDeque::is_empty")]
  pub history: VecDeque<ReviewRecord>,
  #[serde(skip, default = "default_capacity")]
  capacity: usize,
}

impl Default for ReviewTelemetry {
  fn default() -> Self {
    Self::new(DEFAULT_HISTORY_CAPACITY)
  }
}

impl ReviewTelemetry {
  /// Empty telemetry. A capacity of 0 keeps aggregates only.
  pub fn new(capacity: usize) -> Self {
    Self {
      total_reviews: 0,
      correct_reviews: 0,
      average_response_time_ms: 0.0,
      history: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Rebuild telemetry from stored aggregates and the tail of the review log.
  pub fn restore(
    capacity: usize,
    total_reviews: i64,
    correct_reviews: i64,
    average_response_time_ms: f64,
    recent: impl IntoIterator<Item = ReviewRecord>,
  ) -> Self {
    let mut telemetry = Self::new(capacity);
    telemetry.total_reviews = total_reviews;
    telemetry.correct_reviews = correct_reviews;
    telemetry.average_response_time_ms = average_response_time_ms;
    for record in recent {
      telemetry.push_history(record);
    }
    telemetry
  }

  pub fn record(&mut self, record: ReviewRecord) {
    let old_total = self.total_reviews;
    let new_total = old_total + 1;

    self.average_response_time_ms = (self.average_response_time_ms * old_total as f64
      + record.response_time_ms as f64)
      / new_total as f64;
    self.total_reviews = new_total;
    if record.is_correct() {
      self.correct_reviews += 1;
    }
    self.push_history(record);
  }

  fn push_history(&mut self, record: ReviewRecord) {
    if self.capacity == 0 {
      return;
    }
    while self.history.len() >= self.capacity {
      self.history.pop_front();
    }
    self.history.push_back(record);
  }
}

/// Fold one review into the telemetry and return the updated value.
pub fn record_review_telemetry(mut telemetry: ReviewTelemetry, record: ReviewRecord) -> ReviewTelemetry {
  telemetry.record(record);
  telemetry
}
