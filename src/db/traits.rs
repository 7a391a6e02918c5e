// Database trait — backend-agnostic async interface for all DB operations.
//
// Implemented by SqliteDatabase (wraps rusqlite behind a Mutex). All methods
// are async so the HTTP handlers never care that the backend itself is
// synchronous, and a natively-async backend could slot in later.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{ContactMessage, StatusCheck};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Contact messages ---

    /// Persist an accepted submission.
    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<()>;

    /// Get the most recent submissions, newest first.
    async fn get_recent_messages(&self, limit: u32) -> Result<Vec<ContactMessage>>;

    /// Count all stored submissions.
    async fn message_count(&self) -> Result<i64>;

    // --- Status checks ---

    /// Record an uptime-monitor ping.
    async fn insert_status_check(&self, check: &StatusCheck) -> Result<()>;

    /// Get stored pings, newest first.
    async fn get_status_checks(&self, limit: u32) -> Result<Vec<StatusCheck>>;
}
