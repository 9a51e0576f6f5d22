//! SM-2 scheduling.
//!
//! `compute_next_review` is pure: the caller supplies `now` and persists the
//! result. Intervals grow by tier on the post-increment repetition count
//! (1 day, then 6 days, then the previous interval times the ease factor).
//! Rounding uses `f64::round`, which rounds halves away from zero; intervals
//! are never negative, so this is round-half-up.
//!
//! All times are UTC, where a calendar day is always 24 hours; no DST shift
//! can move `next_review`.

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ReviewQuality, ReviewState};

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Upper bound on a single interval (100 years), keeps `next_review` representable
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
  #[error("quality must be between 0 and 5, got {0}")]
  InvalidQuality(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sm2Result {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub next_review: DateTime<Utc>,
}

impl Sm2Result {
  pub fn state(&self) -> ReviewState {
    ReviewState {
      ease_factor: self.ease_factor,
      interval_days: self.interval_days,
      repetitions: self.repetitions,
    }
  }
}

/// Scheduling state for an item seen for the first time.
pub fn initialize() -> ReviewState {
  ReviewState::default()
}

/// Validate a raw quality rating and run one SM-2 update.
///
/// Out-of-range ratings are rejected before anything is computed; they are
/// never clamped into range.
pub fn compute_next_review(
  state: &ReviewState,
  quality: i64,
  now: DateTime<Utc>,
) -> Result<Sm2Result, SchedulerError> {
  let quality = ReviewQuality::try_from(quality)?;
  Ok(calculate_sm2(state, quality, now))
}

pub fn calculate_sm2(state: &ReviewState, quality: ReviewQuality, now: DateTime<Utc>) -> Sm2Result {
  let q = quality.value() as f64;

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let new_ease_factor = (state.ease_factor + ease_delta).max(MIN_EASE_FACTOR);

  let (new_interval, new_repetitions) = if quality.is_correct() {
    let repetitions = state.repetitions.saturating_add(1);
    let interval = match repetitions {
      1 => 1,
      2 => 6,
      _ => grow_interval(state.interval_days, state.ease_factor),
    };
    (interval, repetitions)
  } else {
    // Failed recall: streak starts over
    (1, 0)
  };

  Sm2Result {
    ease_factor: new_ease_factor,
    interval_days: new_interval,
    repetitions: new_repetitions,
    next_review: add_days(now, new_interval),
  }
}

fn grow_interval(previous_interval: i64, ease_factor: f64) -> i64 {
  let grown = (previous_interval as f64 * ease_factor).round();
  // `as` saturates and maps NaN to 0, the clamp handles both
  (grown as i64).clamp(1, MAX_INTERVAL_DAYS)
}

/// Calendar-day addition
fn add_days(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
  now
    .checked_add_days(Days::new(days.max(1) as u64))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};
  use proptest::prelude::*;

  fn state(ease_factor: f64, interval_days: i64, repetitions: i64) -> ReviewState {
    ReviewState {
      ease_factor,
      interval_days,
      repetitions,
    }
  }

  fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 28, 12, 0, 0).unwrap()
  }

  #[test]
  fn test_initialize_defaults() {
    let initial = initialize();
    assert_eq!(initial.ease_factor, 2.5);
    assert_eq!(initial.interval_days, 1);
    assert_eq!(initial.repetitions, 0);
  }

  #[test]
  fn test_initialize_returns_independent_values() {
    let mut first = initialize();
    let second = initialize();
    first.repetitions = 7;
    first.ease_factor = 1.3;
    assert_eq!(second, initialize());
    assert_ne!(first, second);
  }

  #[test]
  fn test_first_review_perfect() {
    let result = compute_next_review(&state(2.5, 1, 0), 5, fixed_now()).unwrap();
    assert_eq!(result.repetitions, 1);
    assert_eq!(result.interval_days, 1);
    assert!(result.ease_factor > 2.5);
  }

  #[test]
  fn test_second_review_good() {
    let result = compute_next_review(&state(2.5, 1, 1), 4, fixed_now()).unwrap();
    assert_eq!(result.repetitions, 2);
    assert_eq!(result.interval_days, 6);
  }

  #[test]
  fn test_third_review_multiplies_interval() {
    let result = compute_next_review(&state(2.5, 6, 2), 4, fixed_now()).unwrap();
    assert_eq!(result.repetitions, 3);
    // 6 * 2.5 = 15
    assert_eq!(result.interval_days, 15);
  }

  #[test]
  fn test_failed_review_resets() {
    let result = compute_next_review(&state(2.5, 6, 2), 2, fixed_now()).unwrap();
    assert_eq!(result.repetitions, 0);
    assert_eq!(result.interval_days, 1);
  }

  #[test]
  fn test_long_streak_reset_on_blackout() {
    let result = compute_next_review(&state(2.8, 120, 9), 0, fixed_now()).unwrap();
    assert_eq!(result.repetitions, 0);
    assert_eq!(result.interval_days, 1);
    assert!(result.ease_factor < 2.8);
  }

  #[test]
  fn test_ease_factor_floor_applied_exactly() {
    let result = compute_next_review(&state(1.5, 1, 0), 1, fixed_now()).unwrap();
    assert_eq!(result.ease_factor, MIN_EASE_FACTOR);
  }

  #[test]
  fn test_ease_unchanged_for_quality_four() {
    let result = compute_next_review(&state(2.5, 1, 0), 4, fixed_now()).unwrap();
    assert!((result.ease_factor - 2.5).abs() < 1e-9);
  }

  #[test]
  fn test_rejects_out_of_range_quality() {
    let current = state(2.5, 6, 2);
    assert_eq!(
      compute_next_review(&current, -1, fixed_now()),
      Err(SchedulerError::InvalidQuality(-1))
    );
    assert_eq!(
      compute_next_review(&current, 6, fixed_now()),
      Err(SchedulerError::InvalidQuality(6))
    );
    // Input state untouched
    assert_eq!(current, state(2.5, 6, 2));
  }

  #[test]
  fn test_next_review_is_interval_days_ahead() {
    let now = fixed_now();
    let result = compute_next_review(&state(2.5, 1, 1), 4, now).unwrap();
    assert_eq!(result.next_review, now + Duration::days(6));
  }

  #[test]
  fn test_pass_at_max_repetitions_saturates() {
    let result = compute_next_review(&state(2.5, 10, i64::MAX), 4, fixed_now()).unwrap();
    assert_eq!(result.repetitions, i64::MAX);
    assert_eq!(result.interval_days, 25);
  }

  #[test]
  fn test_interval_rounds_half_up() {
    // 3 * 2.5 = 7.5
    let result = compute_next_review(&state(2.5, 3, 2), 5, fixed_now()).unwrap();
    assert_eq!(result.interval_days, 8);
  }

  #[test]
  fn test_interval_capped() {
    let result = compute_next_review(&state(2.5, MAX_INTERVAL_DAYS, 12), 5, fixed_now()).unwrap();
    assert_eq!(result.interval_days, MAX_INTERVAL_DAYS);
    assert!(result.next_review > fixed_now());
  }

  #[test]
  fn test_ease_factor_floor_after_repeated_failures() {
    let mut current = state(2.5, 10, 5);
    for _ in 0..10 {
      current = compute_next_review(&current, 0, fixed_now()).unwrap().state();
    }
    assert_eq!(current.ease_factor, MIN_EASE_FACTOR);
  }

  #[test]
  fn test_interval_grows_over_good_reviews() {
    let mut current = initialize();
    for i in 0..5 {
      current = compute_next_review(&current, 4, fixed_now()).unwrap().state();
      match i {
        0 => assert_eq!(current.interval_days, 1),
        1 => assert_eq!(current.interval_days, 6),
        _ => assert!(current.interval_days > 6),
      }
    }
    // 6 -> 15 -> 38 -> 95
    assert_eq!(current.interval_days, 95);
  }

  proptest! {
    #[test]
    fn prop_ease_floor_and_positive_interval(
      ease in 0.0f64..5.0,
      interval in 0i64..10_000,
      repetitions in 0i64..=i64::MAX,
      quality in 0i64..=5,
    ) {
      let now = fixed_now();
      let result = compute_next_review(&state(ease, interval, repetitions), quality, now).unwrap();
      prop_assert!(result.ease_factor >= MIN_EASE_FACTOR);
      prop_assert!(result.interval_days >= 1);
      prop_assert!(result.next_review > now);
    }

    #[test]
    fn prop_fail_resets_streak(
      ease in 1.3f64..4.0,
      interval in 0i64..10_000,
      repetitions in 0i64..=i64::MAX,
      quality in 0i64..3,
    ) {
      let result = compute_next_review(&state(ease, interval, repetitions), quality, fixed_now()).unwrap();
      prop_assert_eq!(result.repetitions, 0);
      prop_assert_eq!(result.interval_days, 1);
    }

    #[test]
    fn prop_pass_grows_streak(
      ease in 1.3f64..4.0,
      interval in 0i64..10_000,
      repetitions in 0i64..=i64::MAX,
      quality in 3i64..=5,
    ) {
      let result = compute_next_review(&state(ease, interval, repetitions), quality, fixed_now()).unwrap();
      prop_assert_eq!(result.repetitions, repetitions.saturating_add(1));
    }

    #[test]
    fn prop_rejects_everything_outside_scale(quality in prop_oneof![i64::MIN..0i64, 6i64..i64::MAX]) {
      let result = compute_next_review(&initialize(), quality, fixed_now());
      prop_assert_eq!(result, Err(SchedulerError::InvalidQuality(quality)));
    }
  }
}
