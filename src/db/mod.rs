// Database layer — SQLite storage for contact messages and status checks.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever POSTBOX_DB_PATH points
// (defaults to ./postbox.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use traits::Database;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::Connection;

use sqlite::SqliteDatabase;

/// Open (or create) the database and run migrations.
///
/// This is the main entry point — called by `postbox init` and by `serve`,
/// so the server comes up cleanly on a fresh deployment.
pub fn initialize(db_path: &str) -> Result<Arc<dyn Database>> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = open_connection(db_path)?;
    schema::create_tables(&conn)?;

    Ok(Arc::new(SqliteDatabase::new(conn)))
}

/// Open an existing database (fails if it doesn't exist yet).
pub fn open(db_path: &str) -> Result<Arc<dyn Database>> {
    if !Path::new(db_path).exists() {
        anyhow::bail!("Database not found at {}. Run `postbox init` first.", db_path);
    }

    let conn = open_connection(db_path)?;
    Ok(Arc::new(SqliteDatabase::new(conn)))
}

fn open_connection(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(conn)
}
