//! JSON error responses.

use axum::{
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::DbLockError;
use crate::services::ReviewError;
use crate::srs::SchedulerError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub error: String,
  pub code: &'static str,
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  InvalidQuality(String),
  #[error("missing or invalid learner identity")]
  Unauthorized,
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  BadRequest(String),
  #[error("storage error: {0}")]
  Storage(#[from] rusqlite::Error),
  #[error(transparent)]
  Unavailable(#[from] DbLockError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::InvalidQuality(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }

  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidQuality(_) => "INVALID_QUALITY",
      Self::Unauthorized => "UNAUTHORIZED",
      Self::NotFound(_) => "NOT_FOUND",
      Self::BadRequest(_) => "BAD_REQUEST",
      Self::Storage(_) => "INTERNAL_ERROR",
      Self::Unavailable(_) => "UNAVAILABLE",
    }
  }
}

impl From<SchedulerError> for ApiError {
  fn from(err: SchedulerError) -> Self {
    Self::InvalidQuality(err.to_string())
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<ReviewError> for ApiError {
  fn from(err: ReviewError) -> Self {
    match err {
      ReviewError::Scheduler(e) => e.into(),
      err @ ReviewError::InvalidResponseTime(_) => Self::BadRequest(err.to_string()),
      ReviewError::NotFound(item_id) => Self::NotFound(format!("item {} not found", item_id)),
      ReviewError::Storage(e) => Self::Storage(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status.is_server_error() {
      tracing::error!("Request failed: {}", self);
      "Internal server error".to_string()
    } else {
      self.to_string()
    };

    let body = ErrorResponse {
      error: message,
      code: self.code(),
    };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    assert_eq!(
      ApiError::from(SchedulerError::InvalidQuality(7)).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      ApiError::from(ReviewError::NotFound("c1".into())).status(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::from(rusqlite::Error::QueryReturnedNoRows).status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_invalid_quality_message_is_client_visible() {
    let err = ApiError::from(ReviewError::Scheduler(SchedulerError::InvalidQuality(9)));
    assert_eq!(err.code(), "INVALID_QUALITY");
    assert_eq!(err.to_string(), "quality must be between 0 and 5, got 9");
  }

  #[test]
  fn test_oversized_response_time_is_bad_request() {
    let err = ApiError::from(ReviewError::InvalidResponseTime(u64::MAX));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.code(), "BAD_REQUEST");
  }
}
