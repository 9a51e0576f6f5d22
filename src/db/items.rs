//! Review item CRUD and due queries

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::reviews::get_recent_records;
use super::{parse_db_time, to_db_time};
use crate::domain::SrsItem;
use crate::srs::ReviewTelemetry;

const ITEM_COLUMNS: &str = r#"
    learner_id, item_id, ease_factor, interval_days, repetitions, next_review,
    total_reviews, correct_reviews, average_response_time_ms, created_at, updated_at
"#;

pub fn insert_item(conn: &Connection, item: &SrsItem) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO srs_items (learner_id, item_id, ease_factor, interval_days, repetitions, next_review,
                           total_reviews, correct_reviews, average_response_time_ms, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
        params![
            item.learner_id,
            item.item_id,
            item.ease_factor,
            item.interval_days,
            item.repetitions,
            to_db_time(item.next_review),
            item.telemetry.total_reviews,
            item.telemetry.correct_reviews,
            item.telemetry.average_response_time_ms,
            to_db_time(item.created_at),
            to_db_time(item.updated_at),
        ],
    )?;
    Ok(())
}

/// Load one item with the tail of its review history
pub fn get_item(
    conn: &Connection,
    learner_id: &str,
    item_id: &str,
    history_capacity: usize,
) -> Result<Option<SrsItem>> {
    let query = format!(
        "SELECT {} FROM srs_items WHERE learner_id = ?1 AND item_id = ?2",
        ITEM_COLUMNS
    );
    let item = conn
        .query_row(&query, params![learner_id, item_id], |row| {
            row_to_item(row, history_capacity)
        })
        .optional()?;

    let Some(mut item) = item else {
        return Ok(None);
    };

    if history_capacity > 0 {
        let recent = get_recent_records(conn, learner_id, item_id, history_capacity)?;
        item.telemetry = ReviewTelemetry::restore(
            history_capacity,
            item.telemetry.total_reviews,
            item.telemetry.correct_reviews,
            item.telemetry.average_response_time_ms,
            recent,
        );
    }
    Ok(Some(item))
}

/// Create the item with initial scheduling state unless it already exists.
///
/// Returns the stored item and whether it was created by this call.
pub fn enroll_item(
    conn: &Connection,
    learner_id: &str,
    item_id: &str,
    history_capacity: usize,
    now: DateTime<Utc>,
) -> Result<(SrsItem, bool)> {
    if let Some(existing) = get_item(conn, learner_id, item_id, history_capacity)? {
        return Ok((existing, false));
    }

    let item = SrsItem::new(learner_id.to_string(), item_id.to_string(), history_capacity, now);
    insert_item(conn, &item)?;
    tracing::debug!("Enrolled item {} for learner {}", item_id, learner_id);
    Ok((item, true))
}

/// Items with `next_review <= now`, earliest first. History is not loaded.
pub fn get_due_items(
    conn: &Connection,
    learner_id: &str,
    now: DateTime<Utc>,
    limit: usize,
) -> Result<Vec<SrsItem>> {
    let query = format!(
        r#"
    SELECT {}
    FROM srs_items
    WHERE learner_id = ?1 AND next_review <= ?2
    ORDER BY next_review ASC, item_id ASC
    LIMIT ?3
    "#,
        ITEM_COLUMNS
    );
    let mut stmt = conn.prepare(&query)?;

    let items = stmt
        .query_map(params![learner_id, to_db_time(now), limit as i64], |row| {
            row_to_item(row, 0)
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(items)
}

pub fn get_due_count(conn: &Connection, learner_id: &str, now: DateTime<Utc>) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM srs_items WHERE learner_id = ?1 AND next_review <= ?2",
        params![learner_id, to_db_time(now)],
        |row| row.get(0),
    )
}

/// Get the next upcoming review time (only items not yet due)
pub fn get_next_review_time(
    conn: &Connection,
    learner_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    let result: Option<String> = conn.query_row(
        "SELECT MIN(next_review) FROM srs_items WHERE learner_id = ?1 AND next_review > ?2",
        params![learner_id, to_db_time(now)],
        |row| row.get(0),
    )?;

    result.map(|s| parse_db_time(&s, 0)).transpose()
}

/// Persist the scheduling state and telemetry aggregates of an item
pub fn update_item_after_review(conn: &Connection, item: &SrsItem) -> Result<usize> {
    conn.execute(
        r#"
    UPDATE srs_items
    SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review = ?4,
        total_reviews = ?5, correct_reviews = ?6, average_response_time_ms = ?7,
        updated_at = ?8
    WHERE learner_id = ?9 AND item_id = ?10
    "#,
        params![
            item.ease_factor,
            item.interval_days,
            item.repetitions,
            to_db_time(item.next_review),
            item.telemetry.total_reviews,
            item.telemetry.correct_reviews,
            item.telemetry.average_response_time_ms,
            to_db_time(item.updated_at),
            item.learner_id,
            item.item_id,
        ],
    )
}

pub(crate) fn row_to_item(row: &rusqlite::Row, history_capacity: usize) -> Result<SrsItem> {
    let next_review_str: String = row.get(5)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    let mut telemetry = ReviewTelemetry::new(history_capacity);
    telemetry.total_reviews = row.get(6)?;
    telemetry.correct_reviews = row.get(7)?;
    telemetry.average_response_time_ms = row.get(8)?;

    Ok(SrsItem {
        learner_id: row.get(0)?,
        item_id: row.get(1)?,
        ease_factor: row.get(2)?,
        interval_days: row.get(3)?,
        repetitions: row.get(4)?,
        next_review: parse_db_time(&next_review_str, 5)?,
        telemetry,
        created_at: parse_db_time(&created_at_str, 9)?,
        updated_at: parse_db_time(&updated_at_str, 10)?,
    })
}
