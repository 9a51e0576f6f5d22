pub mod sm2;
pub mod telemetry;

pub use sm2::{
  calculate_sm2, compute_next_review, initialize, SchedulerError, Sm2Result, INITIAL_EASE_FACTOR,
  MAX_INTERVAL_DAYS, MIN_EASE_FACTOR,
};
pub use telemetry::{record_review_telemetry, ReviewTelemetry, DEFAULT_HISTORY_CAPACITY};
