pub mod error;
pub mod extract;
pub mod items;
pub mod progress;
pub mod review;

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use error::{ApiError, ErrorResponse};
pub use extract::{ApiJson, ApiQuery};
pub use items::{enroll_item, get_item, item_history};
pub use progress::{health, stats};
pub use review::{due_items, submit_review};

/// All JSON routes with request tracing
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/review", post(submit_review))
    .route("/due", get(due_items))
    .route("/items", post(enroll_item))
    .route("/items/{item_id}", get(get_item))
    .route("/items/{item_id}/history", get(item_history))
    .route("/stats", get(stats))
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
