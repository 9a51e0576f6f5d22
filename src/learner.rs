//! Learner identity extractor.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the learner is identified by the `x-learner-id` header, with a
//! `learner_id` cookie accepted as a fallback for browser clients.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::handlers::ApiError;
use crate::state::AppState;

pub const LEARNER_HEADER: &str = "x-learner-id";
pub const LEARNER_COOKIE: &str = "learner_id";

/// Longest accepted learner id
const MAX_LEARNER_ID_LEN: usize = 128;

/// The learner on whose behalf the request runs.
/// Add this as a handler parameter to require an identity; responds 401 otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerContext {
    pub learner_id: String,
}

impl FromRequestParts<AppState> for LearnerContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(LEARNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let learner_id = match from_header {
            Some(id) => Some(id),
            None => {
                let jar = CookieJar::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::Unauthorized)?;
                jar.get(LEARNER_COOKIE).map(|c| c.value().to_string())
            }
        };

        learner_id
            .map(|id| id.trim().to_string())
            .filter(|id| is_valid_learner_id(id))
            .map(|learner_id| LearnerContext { learner_id })
            .ok_or(ApiError::Unauthorized)
    }
}

fn is_valid_learner_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_LEARNER_ID_LEN && !id.chars().any(char::is_control)
}
