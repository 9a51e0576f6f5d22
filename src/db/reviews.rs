//! Append-only review log

use rusqlite::types::Type;
use rusqlite::{params, Connection, Result};

use super::{parse_db_time, to_db_time};
use crate::domain::{ReviewLog, ReviewRecord};

pub fn insert_review_log(
    conn: &Connection,
    learner_id: &str,
    item_id: &str,
    record: &ReviewRecord,
) -> Result<i64> {
    let response_time_ms = i64::try_from(record.response_time_ms)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    conn.execute(
        r#"
    INSERT INTO review_logs (learner_id, item_id, quality, is_correct, response_time_ms, reviewed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            learner_id,
            item_id,
            record.quality,
            if record.is_correct() { 1 } else { 0 },
            response_time_ms,
            to_db_time(record.reviewed_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Review log entries for an item, newest first
pub fn get_review_logs(
    conn: &Connection,
    learner_id: &str,
    item_id: &str,
    limit: usize,
) -> Result<Vec<ReviewLog>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(
        r#"
    SELECT id, learner_id, item_id, quality, is_correct, response_time_ms, reviewed_at
    FROM review_logs
    WHERE learner_id = ?1 AND item_id = ?2
    ORDER BY reviewed_at DESC, id DESC
    LIMIT ?3
    "#,
    )?;

    let logs = stmt
        .query_map(params![learner_id, item_id, limit], |row| {
            let response_time_ms: i64 = row.get(5)?;
            let reviewed_at: String = row.get(6)?;
            Ok(ReviewLog {
                id: row.get(0)?,
                learner_id: row.get(1)?,
                item_id: row.get(2)?,
                quality: row.get(3)?,
                is_correct: row.get(4)?,
                response_time_ms: u64::try_from(response_time_ms)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(e)))?,
                reviewed_at: parse_db_time(&reviewed_at, 6)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(logs)
}

/// The most recent `limit` reviews of an item as history records, oldest first
pub fn get_recent_records(
    conn: &Connection,
    learner_id: &str,
    item_id: &str,
    limit: usize,
) -> Result<Vec<ReviewRecord>> {
    let mut records: Vec<ReviewRecord> = get_review_logs(conn, learner_id, item_id, limit)?
        .iter()
        .map(ReviewLog::record)
        .collect();
    records.reverse();
    Ok(records)
}

/// Total and correct review counts across all items of a learner
pub fn get_review_totals(conn: &Connection, learner_id: &str) -> Result<(i64, i64)> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(is_correct), 0) FROM review_logs WHERE learner_id = ?1",
        params![learner_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
}
