use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create tables with COMPLETE schema for new databases
    // Migrations below handle upgrades for existing databases
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS srs_items (
      learner_id TEXT NOT NULL,
      item_id TEXT NOT NULL,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 1,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review TEXT NOT NULL,
      total_reviews INTEGER NOT NULL DEFAULT 0,
      correct_reviews INTEGER NOT NULL DEFAULT 0,
      average_response_time_ms REAL NOT NULL DEFAULT 0,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL,
      PRIMARY KEY (learner_id, item_id)
    );

    CREATE TABLE IF NOT EXISTS review_logs (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      learner_id TEXT NOT NULL,
      item_id TEXT NOT NULL,
      quality INTEGER NOT NULL,
      is_correct INTEGER NOT NULL,
      response_time_ms INTEGER NOT NULL DEFAULT 0,
      reviewed_at TEXT NOT NULL,
      FOREIGN KEY (learner_id, item_id) REFERENCES srs_items(learner_id, item_id)
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_srs_items_due ON srs_items(learner_id, next_review);
    CREATE INDEX IF NOT EXISTS idx_review_logs_item ON review_logs(learner_id, item_id);
    CREATE INDEX IF NOT EXISTS idx_review_logs_reviewed_at ON review_logs(reviewed_at);
    "#,
    )?;

    // ============================================================
    // MIGRATIONS FOR EXISTING DATABASES
    // These are no-ops for new databases (columns already exist)
    // ============================================================

    // Migration: telemetry aggregates were added after the first release
    add_column_if_missing(conn, "srs_items", "total_reviews", "INTEGER NOT NULL DEFAULT 0")?;
    add_column_if_missing(conn, "srs_items", "correct_reviews", "INTEGER NOT NULL DEFAULT 0")?;
    add_column_if_missing(conn, "srs_items", "average_response_time_ms", "REAL NOT NULL DEFAULT 0")?;

    Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    conn.prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
        .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
    if !column_exists(conn, table, column) {
        tracing::info!("Migrating {}: adding column {}", table, column);
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
            [],
        )?;
    }
    Ok(())
}
