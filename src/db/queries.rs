// Database queries — CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::models::{ContactMessage, StatusCheck};

// --- Contact messages ---

/// Insert a contact message.
pub fn insert_contact_message(conn: &Connection, message: &ContactMessage) -> Result<()> {
    conn.execute(
        "INSERT INTO contact_messages (id, name, email, message, timestamp, ip_address)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            message.id,
            message.name,
            message.email,
            message.message,
            message.timestamp.to_rfc3339(),
            message.ip_address,
        ],
    )?;
    Ok(())
}

/// Get the most recent contact messages, newest first.
pub fn get_recent_messages(conn: &Connection, limit: u32) -> Result<Vec<ContactMessage>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, message, timestamp, ip_address
         FROM contact_messages
         ORDER BY timestamp DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut messages = Vec::new();
    for row in rows {
        let (id, name, email, message, timestamp, ip_address) = row?;
        messages.push(ContactMessage {
            id,
            name,
            email,
            message,
            timestamp: parse_timestamp(&timestamp)?,
            ip_address,
        });
    }
    Ok(messages)
}

/// Count all stored contact messages.
pub fn message_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM contact_messages", [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

// --- Status checks ---

/// Insert a status check.
pub fn insert_status_check(conn: &Connection, check: &StatusCheck) -> Result<()> {
    conn.execute(
        "INSERT INTO status_checks (id, client_name, timestamp)
         VALUES (?1, ?2, ?3)",
        params![check.id, check.client_name, check.timestamp.to_rfc3339()],
    )?;
    Ok(())
}

/// Get stored status checks, newest first.
pub fn get_status_checks(conn: &Connection, limit: u32) -> Result<Vec<StatusCheck>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_name, timestamp
         FROM status_checks
         ORDER BY timestamp DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut checks = Vec::new();
    for row in rows {
        let (id, client_name, timestamp) = row?;
        checks.push(StatusCheck {
            id,
            client_name,
            timestamp: parse_timestamp(&timestamp)?,
        });
    }
    Ok(checks)
}

/// Timestamps are stored as RFC 3339 text; parse back to UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
