//! Shared application state.

use crate::config::SrsSettings;
use crate::db::DbPool;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared review database
    pub db: DbPool,

    /// Page size and history limits
    pub srs: SrsSettings,
}

impl AppState {
    pub fn new(db: DbPool, srs: SrsSettings) -> Self {
        Self { db, srs }
    }
}
