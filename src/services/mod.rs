//! Business logic that spans the scheduler and storage.

pub mod reviews;

pub use reviews::{submit_review, ReviewError, ReviewOutcome, ReviewSubmission, MAX_RESPONSE_TIME_MS};
