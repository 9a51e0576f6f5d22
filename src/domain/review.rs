use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::SchedulerError;

/// Recall quality on the 0-5 SM-2 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReviewQuality {
  /// Complete blackout
  Blackout = 0,
  /// Incorrect, but the answer was remembered on seeing it
  Incorrect = 1,
  /// Incorrect, but the answer felt familiar
  IncorrectFamiliar = 2,
  /// Correct, with serious difficulty
  CorrectDifficult = 3,
  /// Correct, after hesitation
  CorrectHesitant = 4,
  /// Perfect, effortless recall
  Perfect = 5,
}

impl ReviewQuality {
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Blackout),
      1 => Some(Self::Incorrect),
      2 => Some(Self::IncorrectFamiliar),
      3 => Some(Self::CorrectDifficult),
      4 => Some(Self::CorrectHesitant),
      5 => Some(Self::Perfect),
      _ => None,
    }
  }

  pub fn value(&self) -> u8 {
    *self as u8
  }

  /// Quality 3 and above counts as a successful recall
  pub fn is_correct(&self) -> bool {
    self.value() >= 3
  }
}

impl TryFrom<i64> for ReviewQuality {
  type Error = SchedulerError;

  fn try_from(value: i64) -> Result<Self, Self::Error> {
    u8::try_from(value)
      .ok()
      .and_then(Self::from_u8)
      .ok_or(SchedulerError::InvalidQuality(value))
  }
}

/// One entry of a review history: what was rated, how long it took, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
  pub quality: u8,
  pub response_time_ms: u64,
  pub reviewed_at: DateTime<Utc>,
}

impl ReviewRecord {
  pub fn new(quality: ReviewQuality, response_time_ms: u64, reviewed_at: DateTime<Utc>) -> Self {
    Self {
      quality: quality.value(),
      response_time_ms,
      reviewed_at,
    }
  }

  pub fn is_correct(&self) -> bool {
    self.quality >= 3
  }
}

/// A persisted row of the append-only review log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLog {
  pub id: i64,
  pub learner_id: String,
  pub item_id: String,
  pub quality: u8,
  pub is_correct: bool,
  pub response_time_ms: u64,
  pub reviewed_at: DateTime<Utc>,
}

impl ReviewLog {
  pub fn record(&self) -> ReviewRecord {
    ReviewRecord {
      quality: self.quality,
      response_time_ms: self.response_time_ms,
      reviewed_at: self.reviewed_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_quality_from_valid_range() {
    for value in 0..=5i64 {
      let quality = ReviewQuality::try_from(value).unwrap();
      assert_eq!(quality.value() as i64, value);
    }
  }

  #[test]
  fn test_quality_rejects_out_of_range() {
    assert_eq!(
      ReviewQuality::try_from(-1i64),
      Err(SchedulerError::InvalidQuality(-1))
    );
    assert_eq!(
      ReviewQuality::try_from(6i64),
      Err(SchedulerError::InvalidQuality(6))
    );
    assert_eq!(
      ReviewQuality::try_from(i64::MAX),
      Err(SchedulerError::InvalidQuality(i64::MAX))
    );
  }

  #[test]
  fn test_quality_correctness_threshold() {
    assert!(!ReviewQuality::Blackout.is_correct());
    assert!(!ReviewQuality::IncorrectFamiliar.is_correct());
    assert!(ReviewQuality::CorrectDifficult.is_correct());
    assert!(ReviewQuality::Perfect.is_correct());
  }

  #[test]
  fn test_record_keeps_numeric_quality() {
    let now = Utc::now();
    let record = ReviewRecord::new(ReviewQuality::CorrectHesitant, 1200, now);
    assert_eq!(record.quality, 4);
    assert!(record.is_correct());

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["quality"], 4);
    assert_eq!(json["response_time_ms"], 1200);
  }
}
