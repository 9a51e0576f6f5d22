//! Learner-level progress statistics

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use serde::Serialize;

use super::items::{get_due_count, get_next_review_time};
use super::reviews::get_review_totals;

/// Items with at least this many consecutive successful recalls count as learned
pub const LEARNED_REPETITIONS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnerStats {
    pub total_items: i64,
    pub due_count: i64,
    pub items_learned: i64,
    pub total_reviews: i64,
    pub correct_reviews: i64,
    /// Share of reviews rated 3 or above, 0.0 before the first review
    pub accuracy: f64,
    pub next_review: Option<DateTime<Utc>>,
}

fn accuracy(total_reviews: i64, correct_reviews: i64) -> f64 {
    if total_reviews > 0 {
        correct_reviews as f64 / total_reviews as f64
    } else {
        0.0
    }
}

/// Returns (total_items, items_learned)
pub fn get_item_totals(conn: &Connection, learner_id: &str) -> Result<(i64, i64)> {
    conn.query_row(
        r#"
    SELECT COUNT(*), COALESCE(SUM(CASE WHEN repetitions >= ?2 THEN 1 ELSE 0 END), 0)
    FROM srs_items
    WHERE learner_id = ?1
    "#,
        params![learner_id, LEARNED_REPETITIONS],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
}

pub fn get_learner_stats(conn: &Connection, learner_id: &str, now: DateTime<Utc>) -> Result<LearnerStats> {
    let (total_items, items_learned) = get_item_totals(conn, learner_id)?;
    let (total_reviews, correct_reviews) = get_review_totals(conn, learner_id)?;
    let due_count = get_due_count(conn, learner_id, now)?;
    let next_review = if due_count == 0 {
        get_next_review_time(conn, learner_id, now)?
    } else {
        None
    };

    Ok(LearnerStats {
        total_items,
        due_count,
        items_learned,
        total_reviews,
        correct_reviews,
        accuracy: accuracy(total_reviews, correct_reviews),
        next_review,
    })
}
