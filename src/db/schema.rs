// Database schema — table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version` table
// tracks which migrations have run, and each migration is a function that
// executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Contact form submissions that passed rate limiting and the
        -- spam classifier
        CREATE TABLE IF NOT EXISTS contact_messages (
            id TEXT PRIMARY KEY,               -- UUID v4
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            message TEXT NOT NULL,
            timestamp TEXT NOT NULL,           -- RFC 3339, UTC
            ip_address TEXT                    -- submitting client, if known
        );

        -- Uptime-monitor pings from the frontend
        CREATE TABLE IF NOT EXISTS status_checks (
            id TEXT PRIMARY KEY,               -- UUID v4
            client_name TEXT NOT NULL,
            timestamp TEXT NOT NULL            -- RFC 3339, UTC
        );

        -- Index for listing messages newest-first
        CREATE INDEX IF NOT EXISTS idx_messages_timestamp
            ON contact_messages(timestamp);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
#[allow(dead_code)]
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        // Running create_tables twice should not error
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let count = table_count(&conn).unwrap();
        // schema_version, contact_messages, status_checks = 3 tables
        assert_eq!(count, 3i64);
    }

    #[test]
    fn test_run_migration_applies_once() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        run_migration(&conn, 2, |c| {
            c.execute_batch("ALTER TABLE contact_messages ADD COLUMN test_col TEXT;")
        })
        .unwrap();
        // Second run is a no-op — the ALTER would fail if re-executed
        run_migration(&conn, 2, |c| {
            c.execute_batch("ALTER TABLE contact_messages ADD COLUMN test_col TEXT;")
        })
        .unwrap();

        let versions: Vec<i64> = conn
            .prepare("SELECT version FROM schema_version ORDER BY version")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(versions, vec![1, 2]);
    }
}
