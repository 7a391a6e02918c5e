// SqliteDatabase — rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Send.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points — Rust enforces this because
// MutexGuard is !Send.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{ContactMessage, StatusCheck};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_contact_message(&conn, message)
    }

    async fn get_recent_messages(&self, limit: u32) -> Result<Vec<ContactMessage>> {
        let conn = self.conn.lock().await;
        super::queries::get_recent_messages(&conn, limit)
    }

    async fn message_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::message_count(&conn)
    }

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_status_check(&conn, check)
    }

    async fn get_status_checks(&self, limit: u32) -> Result<Vec<StatusCheck>> {
        let conn = self.conn.lock().await;
        super::queries::get_status_checks(&conn, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ContactMessageCreate;
    use crate::db::schema::create_tables;
    use chrono::Utc;

    fn test_db() -> SqliteDatabase {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteDatabase::new(conn)
    }

    #[tokio::test]
    async fn test_trait_message_roundtrip() {
        let db = test_db();
        assert_eq!(db.message_count().await.unwrap(), 0);

        let message = ContactMessage::new(
            ContactMessageCreate {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                message: "Hello, I would like to discuss a project.".to_string(),
            },
            None,
            Utc::now(),
        );
        db.insert_contact_message(&message).await.unwrap();

        assert_eq!(db.message_count().await.unwrap(), 1);
        let loaded = db.get_recent_messages(10).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_trait_status_check_roundtrip() {
        let db = test_db();
        let check = StatusCheck::new("monitor".to_string(), Utc::now());
        db.insert_status_check(&check).await.unwrap();
        let loaded = db.get_status_checks(10).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, check.id);
    }

    #[tokio::test]
    async fn test_trait_table_count() {
        let db = test_db();
        assert_eq!(db.table_count().await.unwrap(), 3);
    }
}
